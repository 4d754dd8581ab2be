use folio_core::{
    Artifact, ArtifactGroup, Dimensions, GroupMember, MASTER_DOCUMENT_KEY, RunContext,
    USER_PROMPT_KEY, is_reserved_key,
};

#[test]
fn context_is_seeded_with_prompt() {
    let context = RunContext::new("a lighthouse keeper");
    assert_eq!(context.len(), 1);
    assert_eq!(context.user_prompt(), "a lighthouse keeper");
    assert_eq!(
        context.get(USER_PROMPT_KEY),
        Some(&Artifact::Text("a lighthouse keeper".to_string()))
    );
    assert_eq!(context.step_keys().count(), 0);
}

#[test]
fn context_preserves_insertion_order() {
    let mut context = RunContext::new("prompt");
    context.insert("plot", Artifact::Text("plot".to_string()));
    context.insert("concept", Artifact::Text("concept".to_string()));
    context.insert("cover", Artifact::Group(ArtifactGroup::new()));
    context.insert(MASTER_DOCUMENT_KEY, Artifact::Text("manifest".to_string()));

    assert_eq!(
        context.keys().collect::<Vec<_>>(),
        vec![USER_PROMPT_KEY, "plot", "concept", "cover", MASTER_DOCUMENT_KEY]
    );
    assert_eq!(context.step_keys().collect::<Vec<_>>(), vec!["plot", "concept", "cover"]);
    assert_eq!(
        context.packaged_entries().map(|(key, _)| key).collect::<Vec<_>>(),
        vec!["plot", "concept", "cover", MASTER_DOCUMENT_KEY]
    );
}

#[test]
fn reserved_keys_are_recognized() {
    assert!(is_reserved_key(USER_PROMPT_KEY));
    assert!(is_reserved_key(MASTER_DOCUMENT_KEY));
    assert!(!is_reserved_key("recap"));
}

#[test]
fn group_keeps_member_order_and_replaces_in_place() {
    let mut group: ArtifactGroup = [
        ("image_1.png", GroupMember::Binary(vec![1])),
        ("image_2.png", GroupMember::Binary(vec![2])),
    ]
    .into_iter()
    .collect();

    let previous = group.insert("image_1.png", GroupMember::Binary(Vec::new()));
    assert_eq!(previous, Some(GroupMember::Binary(vec![1])));
    assert_eq!(group.names().collect::<Vec<_>>(), vec!["image_1.png", "image_2.png"]);
    assert!(group.get("image_1.png").is_some_and(GroupMember::is_empty));
}

#[test]
fn prompt_text_forms_are_deterministic() {
    assert_eq!(Artifact::Text("hello".to_string()).prompt_text(), "hello");
    assert_eq!(
        Artifact::Binary(vec![0; 12]).prompt_text(),
        "[binary artifact, 12 bytes]"
    );

    let group: ArtifactGroup = [
        ("script_1.cs", GroupMember::Text("class A {}".to_string())),
        ("script_2.cs", GroupMember::Text("class B {}".to_string())),
    ]
    .into_iter()
    .collect();
    assert_eq!(Artifact::Group(group).prompt_text(), "script_1.cs, script_2.cs");
}

#[test]
fn dimensions_parse_and_display() {
    assert_eq!("1024x1792".parse::<Dimensions>().unwrap(), Dimensions::PORTRAIT);
    assert_eq!(" 512 X 256 ".parse::<Dimensions>().unwrap(), Dimensions::new(512, 256));
    assert_eq!(Dimensions::default().to_string(), "1024x1024");
    assert!("0x1024".parse::<Dimensions>().is_err());
    assert!("widexhigh".parse::<Dimensions>().is_err());
}
