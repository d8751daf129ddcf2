use abbrev_export::record::{Abbreviation, AbbreviationId, UserId, UserSummary};
use abbrev_export::selection::{SelectionSession, SessionError};

fn make_abbr(id: u64, abbreviation: &str, meaning: &str, category: &str) -> Abbreviation {
    Abbreviation {
        id: AbbreviationId::new(id),
        abbreviation: abbreviation.to_string(),
        meaning: meaning.to_string(),
        description: "shared description text".to_string(),
        category: category.to_string(),
        user: UserSummary {
            id: UserId::new(1),
            name: "Ana".to_string(),
        },
        votes: Vec::new(),
        comments: Vec::new(),
    }
}

fn id(raw: u64) -> AbbreviationId {
    AbbreviationId::new(raw)
}

fn make_session() -> SelectionSession {
    let records = vec![
        make_abbr(1, "API", "Application Programming Interface", "Tech"),
        make_abbr(2, "CPU", "Central Processing Unit", "Hardware"),
        make_abbr(3, "GPU", "Graphics Processing Unit", "Hardware"),
    ];
    SelectionSession::new(records, vec!["Hardware".to_string(), "Tech".to_string()])
}

#[test]
fn starts_with_everything_visible_and_nothing_selected() {
    let session = make_session();

    assert_eq!(session.visible_ids(), &[id(1), id(2), id(3)]);
    assert!(session.selected_ids().is_empty());
    assert!(!session.is_all_selected());
    assert!(!session.is_partially_selected());
    assert_eq!(session.categories().len(), 2);
}

#[test]
fn local_search_ignores_description() {
    let mut session = make_session();

    session.set_search("description");
    assert!(session.visible().is_empty(), "local search covers abbreviation and meaning only");

    session.set_search("PROCESSING");
    assert_eq!(session.visible_ids(), &[id(2), id(3)]);

    session.set_search("   ");
    assert_eq!(session.visible_ids().len(), 3);
}

#[test]
fn category_narrows_visible_records() {
    let mut session = make_session();

    session.set_category(Some("Hardware".to_string()));
    assert_eq!(session.visible_ids(), &[id(2), id(3)]);

    session.set_search("gpu");
    assert_eq!(session.visible_ids(), &[id(3)]);

    session.set_category(None);
    session.set_search("");
    assert_eq!(session.visible_ids().len(), 3);
}

#[test]
fn toggle_adds_and_removes() {
    let mut session = make_session();

    session.toggle(id(2));
    session.toggle(id(1));
    assert_eq!(session.selected_ids(), &[id(2), id(1)]);
    assert!(session.is_selected(id(1)));
    assert!(session.is_partially_selected());

    session.toggle(id(2));
    assert_eq!(session.selected_ids(), &[id(1)]);
    assert!(!session.is_selected(id(2)));
}

#[test]
fn select_all_covers_visible_then_clears() {
    let mut session = make_session();
    session.set_category(Some("Hardware".to_string()));

    session.toggle_select_all();
    assert_eq!(session.selected_ids(), &[id(2), id(3)]);
    assert!(session.is_all_selected());
    assert!(!session.is_partially_selected());

    session.toggle_select_all();
    assert!(session.selected_ids().is_empty());
}

#[test]
fn export_requires_a_selection() {
    let session = make_session();

    assert_eq!(session.export_criteria(), Err(SessionError::NothingSelected));
}

#[test]
fn export_sends_only_explicit_ids() {
    let mut session = make_session();
    session.set_search("processing");
    session.set_category(Some("Hardware".to_string()));
    session.toggle(id(3));

    let criteria = session.export_criteria().unwrap();

    assert_eq!(criteria.ids, vec![id(3)]);
    assert_eq!(criteria.search, None);
    assert_eq!(criteria.category, None);
}

#[test]
fn refresh_reapplies_filters_and_keeps_selection() {
    let mut session = make_session();
    session.set_category(Some("Tech".to_string()));
    session.toggle(id(1));

    session.refresh(
        vec![
            make_abbr(1, "API", "Application Programming Interface", "Tech"),
            make_abbr(4, "SDK", "Software Development Kit", "Tech"),
        ],
        vec!["Tech".to_string()],
    );

    assert_eq!(session.visible_ids(), &[id(1), id(4)]);
    assert_eq!(session.selected_ids(), &[id(1)]);
    assert!(session.is_partially_selected());
}

#[test]
fn hidden_selections_do_not_count_as_all_selected() {
    let mut session = make_session();
    session.toggle(id(1));

    session.set_category(Some("Hardware".to_string()));

    assert!(!session.is_all_selected());
    assert!(!session.is_partially_selected());
    assert_eq!(session.selected_ids(), &[id(1)]);

    session.toggle(id(2));
    assert!(session.is_partially_selected());
}
