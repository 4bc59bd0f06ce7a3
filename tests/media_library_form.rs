use chrono::{TimeZone, Utc};
use pbx_admin_sdk::entity::{media_library, validate_record, MediaLibrary};
use pbx_admin_sdk::form::{Attributes, Catalog, FormHelper, Label, StaticView};
use serde_json::{json, Map, Value};

fn submission() -> Map<String, Value> {
    match json!({
        "media_id": "",
        "description": "",
        "filename": "hold.wav",
        "path": "   ",
        "category": "2"
    }) {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

#[test]
fn rejected_submission_renders_errors_and_prior_values() {
    let posted = submission();
    let errors = validate_record(&media_library(), &posted).scoped("media");
    assert_eq!(errors.len(), 2, "{:?}", errors);

    let view = StaticView::new("MediaManager", "*.add")
        .with_url("/mediamanager/add")
        .with_value("media", Value::Object(posted));
    let catalog = Catalog::new().with("Description", "Beschreibung");
    let mut form = FormHelper::new(&view).with_errors(&errors).with_translator(&catalog);

    let mut html = form.open_multipart(None, Attributes::new(), &[("media[media_id]", None)]);
    html = html + form.label("media[description]", Some("Description"), "");
    html = html + form.input("media[description]", None, "");
    html = html + form.label(Label::new("media[filename]").hint("Stored name"), Some("File"), "");
    html = html + form.input("media[filename]", None, "");
    html = html + form.dropdown("media[category]", [("0", "General"), ("2", "Music on hold")], None, "");
    html = html + form.close("");

    assert!(html.contains("id=\"mediamanager_add\" class=\"form form_1 multipart mediamanager add\""));
    assert!(html.contains("name=\"freepbx_form_name\" value=\"mediamanager_add\""));
    assert!(html.contains(">Beschreibung<span id=\"issue_label_media_description\""));
    assert!(html.contains(">description must not be blank</span>"));
    assert!(html.contains("class=\"input mediamanager add has_error\""));
    assert!(html.contains("name=\"media[filename]\" value=\"hold.wav\" class=\"input mediamanager add\""));
    assert!(html.contains("<span id=\"hint_label_media_filename\""));
    assert!(html.contains("<option value=\"2\" selected=\"selected\">Music on hold</option>"));
    assert!(html.ends_with("</form>"));
    assert_eq!(form.depth(), 0);
}

#[test]
fn stored_row_repopulates_edit_form() {
    let mut record = Map::new();
    record.insert("description".into(), json!("Welcome greeting"));
    record.insert("filename".into(), json!("welcome.wav"));
    record.insert("path".into(), json!("/var/lib/media/welcome.wav"));
    record.insert("media_id".into(), json!(12));
    let entity = media_library();
    let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("valid instant");
    entity.prepare_insert(&mut record, created);
    assert!(validate_record(&entity, &record).is_empty());

    let row = MediaLibrary::from_record(record).expect("decodes");
    assert_eq!(row.category, 0);
    assert_eq!(row.created_at, Some(created));

    let view = StaticView::new("mediamanager", "edit").with_record("media", row);
    let mut form = FormHelper::new(&view);
    let html = form.hidden(&[("media[media_id]", None)]) + form.textarea("media[description]", None, "");
    assert!(html.contains("name=\"media[media_id]\" value=\"12\""));
    assert!(html.contains(">Welcome greeting</textarea>"));

    let mut out = Vec::new();
    html.emit_to(&mut out).expect("write to vec");
    assert_eq!(String::from_utf8(out).expect("utf8"), html.as_str());
}
