// src/ports/html.rs
use crate::constants::IMAGE_DISPLAY_WIDTH_PX;
use crate::domain::{ImageRef, Note};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    fn render_image(&self, image: &ImageRef) -> String {
        match image {
            ImageRef::Url { url } => format!(
                r#"<img src="{}" alt="note" style="width: {}px">"#,
                encode_double_quoted_attribute(url),
                IMAGE_DISPLAY_WIDTH_PX
            ),
            ImageRef::Key { key } | ImageRef::Unresolved { key, .. } => format!(
                r#"<div class="image-missing">Image unavailable: {}</div>"#,
                encode_text(key)
            ),
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn render_note(&self, note: &Note) -> String {
        let image = note
            .image
            .as_ref()
            .map(|image| self.render_image(image))
            .unwrap_or_default();

        format!(
            r#"        <div class="note" data-id="{id}">
            <h2>{name}</h2>
            <p>{description}</p>
            {image}
        </div>"#,
            id = encode_double_quoted_attribute(note.id.as_str()),
            name = encode_text(&note.name),
            description = encode_text(&note.description),
            image = image,
        )
    }

    pub fn render(&self, notes: &[Note]) -> String {
        let body = if notes.is_empty() {
            r#"        <p class="empty">No notes yet</p>"#.to_string()
        } else {
            notes
                .iter()
                .map(|note| self.render_note(note))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>My Notes App</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            text-align: center;
        }}
        .notes {{
            margin-bottom: 30px;
        }}
        .note {{
            padding: 1rem 0;
            border-bottom: 1px solid #eee;
        }}
        .image-missing, .empty {{
            color: #666;
            font-size: 0.9em;
        }}
    </style>
</head>
<body>
    <h1>My Notes App</h1>
    <div class="notes">
{body}
    </div>
</body>
</html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ImageRef::Url { url: "https://b.example/public/a.png".to_string() }, r#"<img src="https://b.example/public/a.png""#)]
    #[case(ImageRef::Key { key: "a.png".to_string() }, "Image unavailable: a.png")]
    #[case(ImageRef::Unresolved { key: "<b>.png".to_string(), reason: "gone".to_string() }, "Image unavailable: &lt;b&gt;.png")]
    fn given_image_ref_when_rendering_then_shows_image_or_fallback(
        #[case] image: ImageRef,
        #[case] expected: &str,
    ) {
        let presenter = HtmlPresenter::new();

        let html = presenter.render_image(&image);

        assert!(html.contains(expected), "{html}");
    }
}
