// src/ports/text.rs
use crate::constants::LIST_DESCRIPTION_WIDTH;
use crate::domain::{ImageRef, Note};
use crate::util::text::{single_line, summarize};

/// One line per note, for the terminal.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, notes: &[Note]) -> String {
        if notes.is_empty() {
            return "No notes".to_string();
        }
        notes
            .iter()
            .map(|note| {
                let mut line = format!(
                    "{}\t{}\t{}",
                    note.id,
                    single_line(&note.name),
                    single_line(&summarize(&note.description, LIST_DESCRIPTION_WIDTH))
                );
                match &note.image {
                    Some(ImageRef::Url { url }) => line.push_str(&format!("\t{url}")),
                    Some(ImageRef::Key { key } | ImageRef::Unresolved { key, .. }) => {
                        line.push_str(&format!("\t[unavailable: {key}]"))
                    }
                    None => {}
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_notes_when_rendering_then_says_so() {
        assert_eq!(TextPresenter::new().render(&[]), "No notes");
    }

    #[test]
    fn given_notes_when_rendering_then_one_tab_separated_line_each() {
        let mut with_image = Note::from_wire("2", "Cat", "photo", None);
        with_image.image = Some(ImageRef::Url {
            url: "https://b.example/public/cat.png".to_string(),
        });
        let notes = vec![Note::from_wire("1", "Groceries", "milk\neggs", None), with_image];

        let output = TextPresenter::new().render(&notes);

        assert_eq!(
            output,
            "1\tGroceries\tmilk\n2\tCat\tphoto\thttps://b.example/public/cat.png"
        );
    }

    #[test]
    fn given_name_with_tab_and_newline_when_rendering_then_stays_on_one_line() {
        let notes = vec![Note::from_wire("1", "Shop\tlist\nweekly", "a\tb", None)];

        let output = TextPresenter::new().render(&notes);

        assert_eq!(output, "1\tShop list weekly\ta b");
        assert_eq!(output.lines().count(), 1);
    }
}
