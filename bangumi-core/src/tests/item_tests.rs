use super::*;

#[test]
fn null_text_fields_become_empty() {
    let json = r#"{"name": null, "nameCN": "进击的巨人", "labels": null}"#;
    let item: BangumiItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.name, "");
    assert_eq!(item.name_cn, "进击的巨人");
    assert!(item.labels.is_empty());
    assert_eq!(item.id, None);
    assert_eq!(item.sort_order, None);
}

#[test]
fn uses_source_field_names() {
    let item = BangumiItem::new("Shingeki no Kyojin")
        .with_id(7)
        .with_name_cn("进击的巨人")
        .with_label("genre", "action");
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["id"], 7);
    assert_eq!(value["nameCN"], "进击的巨人");
    assert_eq!(value["labels"][0]["label"], "genre");
    assert_eq!(value["labels"][0]["value"], "action");
    assert!(value["sort_order"].is_null());
}

#[test]
fn missing_id_is_omitted() {
    let value = serde_json::to_value(BangumiItem::new("x")).unwrap();
    assert!(value.get("id").is_none());
}

#[test]
fn export_strips_id_and_sort_order() {
    let mut item = BangumiItem::new("Mushishi").with_id(3);
    item.sort_order = Some(0);
    let value = serde_json::to_value(ExportItem::from(&item)).unwrap();
    let obj = value.as_object().unwrap();
    assert!(!obj.contains_key("id"));
    assert!(!obj.contains_key("sort_order"));
    assert_eq!(obj["name"], "Mushishi");
    assert_eq!(obj.len(), 6);
}

#[test]
fn display_name_prefers_localized() {
    let item = BangumiItem::new("Mushishi");
    assert_eq!(item.display_name(), "Mushishi");
    let item = item.with_name_cn("虫师");
    assert_eq!(item.display_name(), "虫师");
}
