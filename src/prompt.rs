use crate::models::ProductContentRequest;

/// Instruction sent to the text model for a listing rewrite.
pub fn build_content_prompt(req: &ProductContentRequest) -> String {
    let location = &req.artisan_location;
    let keywords = req.keywords.join(", ");
    format!(
        "You are assisting local artisans in selling their handmade crafts.

IMPORTANT: Always use the provided Artisan Location (\"{location}\") exactly as given. Do not invent or replace it with other locations. If it is empty, simply omit the location.

Provided product details:
- Current Title: {title}
- Existing Description: {description}
- Raw Story: {story}
- Artisan Location: {location}
- Keywords to include: {keywords}

Task:
1. Suggest a better, polished product title (max 6 words) and include some of the keywords if possible.
2. Write an engaging, customer-friendly description (2-3 sentences) that naturally weaves in the keywords.
3. Write a cultural backstory for the product, including:
   - Likely raw materials used
   - Traditional techniques
   - A touch of local culture that must explicitly include the artisan's location (\"{location}\").
   - Keep it warm, authentic, and persuasive

Output format:
Title: <title>
Description: <description>
Backstory: <backstory>
",
        title = req.title,
        description = req.description,
        story = req.story,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProductContentRequest {
        ProductContentRequest {
            title: "Bowl".into(),
            story: "Made by hand".into(),
            description: "A small bowl".into(),
            artisan_location: "Jaipur".into(),
            keywords: vec!["clay".into(), "blue pottery".into()],
            ..Default::default()
        }
    }

    #[test]
    fn interpolates_every_product_field() {
        let prompt = build_content_prompt(&request());
        assert!(prompt.contains("- Current Title: Bowl"));
        assert!(prompt.contains("- Existing Description: A small bowl"));
        assert!(prompt.contains("- Raw Story: Made by hand"));
        assert!(prompt.contains("- Artisan Location: Jaipur"));
        assert!(prompt.contains("- Keywords to include: clay, blue pottery"));
        assert!(prompt.contains("Artisan Location (\"Jaipur\") exactly as given"));
        assert!(prompt.contains("artisan's location (\"Jaipur\")"));
    }

    #[test]
    fn ends_with_three_line_template() {
        let prompt = build_content_prompt(&request());
        assert!(prompt.trim_end().ends_with("Title: <title>\nDescription: <description>\nBackstory: <backstory>"));
        assert!(prompt.contains("(max 6 words)"));
        assert!(prompt.contains("(2-3 sentences)"));
    }

    #[test]
    fn empty_keywords_and_location_still_render() {
        let req = ProductContentRequest { title: "Mat".into(), ..Default::default() };
        let prompt = build_content_prompt(&req);
        assert!(prompt.contains("- Keywords to include: \n"));
        assert!(prompt.contains("If it is empty, simply omit the location."));
        assert_eq!(prompt, build_content_prompt(&req));
    }
}
