use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    content: &'a str,
}

/// Wraps already rendered `content` in the page layout.
pub fn render_main(title: &str, content: &str) -> Result<String, askama::Error> {
    IndexTemplate { title, content }.render()
}
