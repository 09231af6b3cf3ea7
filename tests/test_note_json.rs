use noteboard::domain::{ImageRef, Note};
use anyhow::Result;

#[test]
fn given_note_when_serializing_to_json_then_contains_all_fields() -> Result<()> {
    // Arrange
    let note = Note::from_wire("42", "Groceries", "milk, eggs", None);

    // Act
    let json = serde_json::to_string_pretty(&note)?;

    // Assert
    assert!(json.contains(r#""id": "42""#));
    assert!(json.contains(r#""name": "Groceries""#));
    assert!(json.contains(r#""description": "milk, eggs""#));
    assert!(json.contains(r#""image": null"#));
    Ok(())
}

#[test]
fn given_resolved_image_when_serializing_then_tags_kind_and_url() -> Result<()> {
    // Arrange
    let mut note = Note::from_wire("1", "Cat", "sofa", None);
    note.image = Some(ImageRef::Url {
        url: "https://bucket.example.com/public/cat.png".to_string(),
    });

    // Act
    let value = serde_json::to_value(&note)?;

    // Assert
    assert_eq!(value["image"]["kind"], "url");
    assert_eq!(value["image"]["url"], "https://bucket.example.com/public/cat.png");
    Ok(())
}

#[test]
fn given_unresolved_image_when_serializing_then_keeps_key_and_reason() -> Result<()> {
    // Arrange
    let mut note = Note::from_wire("1", "Cat", "sofa", None);
    note.image = Some(ImageRef::Unresolved {
        key: "cat.png".to_string(),
        reason: "Blob not found: cat.png".to_string(),
    });

    // Act
    let value = serde_json::to_value(&note)?;

    // Assert
    assert_eq!(value["image"]["kind"], "unresolved");
    assert_eq!(value["image"]["key"], "cat.png");
    assert_eq!(value["image"]["reason"], "Blob not found: cat.png");
    Ok(())
}
