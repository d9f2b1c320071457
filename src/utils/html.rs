// src/utils/html.rs

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: harmless formatting tags (like <b>, <p>) survive, while <script>,
/// <iframe> and event-handler attributes are dropped together with script content.
/// Applied to question text on upload and to every stored answer field.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_handlers() {
        assert_eq!(clean_html("<script>alert(1)</script>ok"), "ok");
        assert_eq!(clean_html("<p onclick=\"x()\">hi</p>"), "<p>hi</p>");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(clean_html("Hello, world"), "Hello, world");
        assert_eq!(clean_html("1,2,3"), "1,2,3");
    }
}
