use crate::services::extraction::text::truncate_chars;

/// 构造带试卷内容的系统提示
pub fn build_system_prompt(
    title: &str,
    course_label: Option<&str>,
    paper_text: &str,
    max_chars: usize,
) -> String {
    let (content, truncated) = truncate_chars(paper_text, max_chars);

    let mut prompt = String::from(
        "You are a helpful study assistant for Rongo University students. \
         Answer questions about the exam paper below: explain questions, outline how to \
         approach them and summarise topics. Be concise and accurate, and say so when the \
         paper does not contain the answer.\n\n",
    );
    prompt.push_str(&format!("Paper title: {title}\n"));
    if let Some(course) = course_label {
        prompt.push_str(&format!("Course: {course}\n"));
    }
    prompt.push_str("\nPaper content:\n");
    prompt.push_str(content);
    if truncated {
        prompt.push_str("\n[Content truncated]");
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context() {
        let prompt = build_system_prompt(
            "Farm Management CAT",
            Some("AGEC 201 - Farm Management"),
            "QUESTION ONE",
            100,
        );
        assert!(prompt.contains("Paper title: Farm Management CAT"));
        assert!(prompt.contains("Course: AGEC 201 - Farm Management"));
        assert!(prompt.ends_with("QUESTION ONE"));
    }

    #[test]
    fn test_prompt_truncates_content() {
        let prompt = build_system_prompt("Uploaded paper", None, "abcdefghij", 4);
        assert!(!prompt.contains("Course:"));
        assert!(prompt.contains("abcd\n[Content truncated]"));
        assert!(!prompt.contains("abcde"));
    }
}
