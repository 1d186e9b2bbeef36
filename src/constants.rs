//! Endpoint defaults and the prompt templates used by the report pipelines
//! and the chat session. Placeholders in `{braces}` are filled by
//! [`crate::utils::render`].

/// Default URL of the history-based chat endpoint.
pub const DEFAULT_UL_CHAT_URL: &str = "https://prod.ulchatbot.com/api/chats/chat/advanced";

/// Default URL and model of the messages-based chat endpoint.
pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

/// Environment variables the credentials are read from.
pub const UL_TOKEN_ENV: &str = "UL_CHAT_TOKEN";
pub const GROQ_KEY_ENV: &str = "GROQ_API_KEY";

/// Per-attribute comparison prompt. Sets are substituted back to country
/// names in the report so the model cannot be biased by them.
pub const COMPARE_ATTRIBUTES_PROMPT: &str = "Compare these two sets of information:\n\
Set 1: {set1}\n\
Set 2: {set2}\n\n\
Rules for comparison:\n\
1. If both sets are completely identical, respond with: 'same'\n\
2. If there are differences, respond in this format:\n\
Common Elements: [list items that appear in both sets]\n\
Only in Set 1: [list items unique to Set 1]\n\
Only in Set 2: [list items unique to Set 2]\n\
3. Treat comma-separated items as separate elements\n\
4. Compare exact content including spacing and punctuation\n\
5. Do not provide any additional analysis";

/// Project overview section of the two-country plan.
pub const PLAN_OVERVIEW_PROMPT: &str = "Create a professional project overview for a {product} compliance plan targeting {countries} markets.\n\
Base your response on this regulatory data, organizing by regulatory categories:\n\n\
{data}\n\n\
Format guidelines:\n\
1. Begin with a clear objective statement\n\
2. For each regulatory category, provide a separate paragraph summarizing key requirements\n\
3. Use professional business language\n\
4. Avoid special characters or bullet points\n\
5. Highlight market-specific requirements within each category's paragraph";

/// Per-category analysis section.
pub const PLAN_CATEGORY_PROMPT: &str = "Provide a detailed analysis of {category} requirements for {product} in {countries} markets.\n\n\
Data for this category:\n\
{data}\n\n\
Format guidelines:\n\
1. Begin with an overview of {category} requirements\n\
2. Address each attribute/subcategory separately in clear paragraphs\n\
3. Compare requirements between {countries}\n\
4. Highlight any specific standards, regulations, or authorities mentioned\n\
5. Use professional business language without special characters\n\
6. Include any specific testing, certification, or documentation requirements related to this category";

/// Implementation timeline section.
pub const PLAN_TIMELINE_PROMPT: &str = "Create a professional implementation timeline for achieving compliance across all regulatory categories in {countries} markets.\n\n\
Categories to consider:\n\
{categories}\n\n\
Format guidelines:\n\
1. Begin with an overview of the complete implementation process\n\
2. Create separate phases for different regulatory categories\n\
3. Include estimated durations for each phase\n\
4. Specify dependencies between different categories\n\
5. Use professional business language without special characters";

/// Cost optimization section.
pub const PLAN_COST_PROMPT: &str = "Develop a cost optimization strategy for compliance across all regulatory categories in {countries} markets.\n\n\
Categories to consider:\n\
{categories}\n\n\
Format guidelines:\n\
1. Begin with an overall cost optimization approach\n\
2. Address each regulatory category's specific cost considerations\n\
3. Identify opportunities for shared resources across categories\n\
4. Suggest efficiency measures for each category\n\
5. Use professional business language without special characters";

/// Risk mitigation section.
pub const PLAN_RISK_PROMPT: &str = "Outline a comprehensive risk mitigation strategy across all regulatory categories for {countries} markets.\n\n\
Categories to consider:\n\
{categories}\n\n\
Format guidelines:\n\
1. Begin with an overall risk management approach\n\
2. Address specific risks for each regulatory category\n\
3. Include monitoring and control measures by category\n\
4. Suggest mitigation strategies for each identified risk\n\
5. Use professional business language without special characters";

/// Executive summary of the multi-country plan.
pub const PLAN_EXECUTIVE_SUMMARY_PROMPT: &str = "Create a concise executive summary for the regulatory compliance strategy for {product} targeting: {countries}.\n\
Focus on:\n\
1. Overview of regulatory scope\n\
2. Key compliance requirements\n\
3. Critical considerations for market entry\n\n\
Please use clear, professional language without special characters or symbols.";

/// Regional pattern analysis section of the multi-country plan.
pub const PLAN_REGIONAL_PATTERNS_PROMPT: &str = "Analyze the following groups of countries that share identical regulatory requirements for {product}:\n\n\
{patterns}\n\n\
Format guidelines:\n\
1. Describe the regional commonalities and what they mean for market entry sequencing\n\
2. Point out where one certification or test report can cover several markets\n\
3. Use professional business language without special characters";

/// System message pinning the chat session to the knowledge base.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful regulatory compliance assistant. \
Your role is to assist users by providing information STRICTLY from the knowledge base provided.\n\n\
IMPORTANT RULES:\n\
1. ONLY use information from the provided context to answer questions\n\
2. If the context doesn't contain the information needed to answer the question, say \"I apologize, but I don't have enough information in the knowledge base to answer this question accurately.\"\n\
3. DO NOT make up or infer information that's not in the context\n\
4. If only partial information is available, provide what's available and clearly state what information is missing\n\
5. Always cite the information as coming from the knowledge base\n\n\
Be professional and accurate in your responses.";

/// Per-question grounded prompt for the chat session.
pub const CHAT_GROUNDED_PROMPT: &str = "Context from knowledge base:\n\
{context}\n\n\
User question: {question}\n\n\
Instructions:\n\
1. Answer ONLY using the information provided in the context above\n\
2. If the context doesn't contain enough information to fully answer the question, say so\n\
3. Do not make up or infer any information not present in the context\n\
4. Begin your response with 'Based on the knowledge base, ...'";

/// Required prefix of every grounded chat answer.
pub const CHAT_ANSWER_PREFIX: &str = "Based on the knowledge base";

/// Fallback answer when retrieval finds nothing or the request fails.
pub const CHAT_APOLOGY: &str = "I apologize, but I don't have enough information in the knowledge base to answer this question accurately.";
