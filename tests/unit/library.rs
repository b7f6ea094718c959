use research_hub::db::enums::LibraryItemType;
use research_hub::db::models::library::{LibraryPage, SaveSuggestedRequest};
use research_hub::validation::library::{
    parse_tags, parse_upload_item_type, storage_file_name, title_or_file_stem,
    validate_save_suggested,
};

#[test]
fn tags_are_split_and_trimmed() {
    assert_eq!(
        parse_tags(Some(" ml, ,vision ,nlp,")),
        vec!["ml".to_string(), "vision".to_string(), "nlp".to_string()]
    );
    assert!(parse_tags(None).is_empty());
    assert!(parse_tags(Some("")).is_empty());
}

#[test]
fn uploads_are_pdf_items() {
    assert_eq!(parse_upload_item_type(None).unwrap(), LibraryItemType::Pdf);
    assert_eq!(parse_upload_item_type(Some("PDF")).unwrap(), LibraryItemType::Pdf);
    assert!(parse_upload_item_type(Some("link")).is_err());
    assert!(parse_upload_item_type(Some("video")).is_err());
}

#[test]
fn title_falls_back_to_file_stem() {
    assert_eq!(title_or_file_stem(Some("My paper"), "x.pdf"), "My paper");
    assert_eq!(title_or_file_stem(None, "attention-is-all.pdf"), "attention-is-all");
    assert_eq!(title_or_file_stem(Some("  "), "report.v2.pdf"), "report.v2");
}

#[test]
fn storage_names_drop_separators() {
    assert_eq!(storage_file_name("paper.pdf"), "paper.pdf");
    assert_eq!(storage_file_name("../../etc/passwd"), "_.._etc_passwd");
    assert_eq!(storage_file_name(""), "document.pdf");
}

#[test]
fn suggested_articles_need_title_link_and_result_id() {
    let full = SaveSuggestedRequest {
        title: "Deep residual learning".to_string(),
        link: "https://arxiv.org/abs/1512.03385".to_string(),
        summary: None,
        result_id: "abc123".to_string(),
    };
    assert!(validate_save_suggested(&full).is_ok());
    assert!(
        validate_save_suggested(&SaveSuggestedRequest {
            result_id: String::new(),
            ..full
        })
        .is_err()
    );
}

#[test]
fn library_page_meta_reports_pages() {
    let page = LibraryPage {
        items: Vec::new(),
        total: 41,
        page: 2,
        limit: 20,
    };
    let meta = serde_json::to_value(page.meta()).unwrap();
    assert_eq!(meta["total_count"], 41);
    assert_eq!(meta["pagination"]["total_pages"], 3);
    assert_eq!(meta["pagination"]["has_next"], true);
    assert_eq!(meta["pagination"]["has_prev"], true);
}
