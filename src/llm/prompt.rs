//! Fixed instructions sent to the text-understanding service

/// Instruction for the service extraction strategy
///
/// The reply is expected to be a JSON object with the four contact keys.
pub const EXTRACTION_INSTRUCTION: &str = concat!(
    "Extract contact information from the web page text below.\n",
    "Respond with a single JSON object and nothing else, using exactly these keys:\n",
    "\"emails\", \"phone_numbers\", \"addresses\", \"social_media\".\n",
    "Each value must be an array of strings, in the order the items appear in the text,\n",
    "without duplicates. Use an empty array when nothing is found. Only report\n",
    "information that is present in the text."
);

/// Instruction for outreach-oriented page summaries
pub const SUMMARY_INSTRUCTION: &str = concat!(
    "You are preparing research to personalise a B2B cold outreach email.\n",
    "Analyse the webpage content and capture details that make the outreach\n",
    "feel bespoke. Use only information that is explicitly stated or strongly\n",
    "implied; never fabricate facts.\n\n",
    "Respond in Markdown with these sections:\n",
    "1. **Company Overview** - one sentence describing what the organisation\n",
    "   does or offers.\n",
    "2. **Ideal Customers / Industries** - audiences they target; write 'Not\n",
    "   mentioned' if absent.\n",
    "3. **Notable Signals** - bullet list of recent initiatives, technologies,\n",
    "   hiring plans, metrics or news relevant to outreach; state 'Not\n",
    "   mentioned' if none.\n",
    "4. **Potential Needs or Pain Points** - briefly connect observed signals\n",
    "   to likely needs; say 'Not evident' when unsure.\n",
    "5. **Suggested Outreach Angle** - one sentence proposing how to tailor an\n",
    "   email using the above insights.\n\n",
    "Keep the entire response under 150 words."
);

/// Assembles the single user message sent to the model
pub fn build_prompt(instruction: &str, text: &str) -> String {
    format!("{}\n\n{}", instruction, text)
}
