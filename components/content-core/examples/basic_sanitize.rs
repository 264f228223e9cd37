//! Sanitizing author-supplied blog HTML

use site_content_core::sanitizer::{ContentSanitizer, SanitizerOptions, sanitize};

fn main() {
    println!("=== Site Content Core - Sanitizer Examples ===\n");

    // Example 1: Formatting survives, scripts do not
    show(
        "Event handler and script URL",
        r#"<img src="javascript:alert(1)"><p onclick="evil()">Hello</p>"#,
    );

    // Example 2: Disallowed wrappers are unwrapped
    show(
        "Unwrapped layout elements",
        "<section><article><h2>Title</h2><p>Body with <em>emphasis</em>.</p></article></section>",
    );

    // Example 3: Safe links are kept
    show(
        "Links",
        r#"<p>Read <a href="/blog/zero-trust">the guide</a> or <a href="data:text/html,x">this</a>.</p>"#,
    );

    // Example 4: Custom allow-list
    let sanitizer = ContentSanitizer::with_options(SanitizerOptions {
        allowed_tags: vec!["p".to_string(), "img".to_string()],
        ..Default::default()
    });
    let html = r#"<div><p>Photo:</p><img src="/images/team.jpg" onerror="x()"></div>"#;
    println!("Custom allow-list (p, img)");
    println!("Input:  {html}");
    println!("Output: {}", sanitizer.sanitize(html));
    println!("---\n");
}

fn show(title: &str, html: &str) {
    println!("{title}");
    println!("Input:  {html}");
    println!("Output: {}", sanitize(html));
    println!("---\n");
}
