/// Sentinel the model is told to use for data missing from the lease
pub const NOT_SPECIFIED: &str = "Not specified in lease";

const SYSTEM_ROLE: &str = "You are an expert commercial real estate attorney specializing in lease analysis and term sheet creation.";

/// Format the template and lease text into the single prompt string sent
/// to the text-generation service
pub fn build_prompt(template_text: &str, lease_text: &str) -> String {
    format!(
        "{SYSTEM_ROLE}

You are a commercial real estate expert. You have been provided with:
1. A lease term sheet template
2. A full commercial lease document

Your task is to analyze the commercial lease and extract all relevant information to create a completed lease term sheet that matches the template format exactly.

LEASE TERM SHEET TEMPLATE:
{template_text}

COMMERCIAL LEASE:
{lease_text}

Please generate a completed lease term sheet that:
1. Follows the exact structure and format of the template
2. Extracts all relevant information from the commercial lease
3. Fills in all sections of the template with appropriate data from the lease
4. Maintains professional formatting
5. Uses clear, concise language
6. If information is not found in the lease, indicate \"{NOT_SPECIFIED}\"

Generate the completed lease term sheet now:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_both_documents_in_order() {
        let prompt = build_prompt("TEMPLATE BODY", "LEASE BODY");
        let template_at = prompt.find("TEMPLATE BODY").unwrap();
        let lease_at = prompt.find("LEASE BODY").unwrap();
        assert!(template_at < lease_at);
        assert!(prompt.starts_with(SYSTEM_ROLE));
    }

    #[test]
    fn test_prompt_mentions_missing_data_sentinel() {
        let prompt = build_prompt("", "");
        assert!(prompt.contains("\"Not specified in lease\""));
        assert!(prompt.ends_with("Generate the completed lease term sheet now:"));
    }

    #[test]
    fn test_prompt_inlines_text_verbatim() {
        let lease = "Rent: {not a placeholder}\n\n  indented";
        assert!(build_prompt("t", lease).contains(lease));
    }
}
