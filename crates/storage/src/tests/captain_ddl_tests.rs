use crate::migrations::m20250104200055_create_captain_tables::{
    ARTICLE_EMBEDDING_INDEX, ASSISTANT_RESPONSES_TABLE, DROP_ORDER, RESPONSES_EMBEDDING_INDEX,
    article_embeddings_ddl, assistant_responses_ddl, assistants_ddl, create_ddl, documents_ddl,
};
use crate::VectorSupport;

fn joined(ddl: &[String]) -> String {
    ddl.join(";\n")
}

#[test]
fn vector_branch_uses_native_type_and_ivfflat() {
    let ddl = joined(&assistant_responses_ddl(VectorSupport::Available));
    assert!(ddl.contains("embedding vector(1536)"));
    assert!(!ddl.contains("jsonb"));
    assert!(ddl.contains(&format!(
        "CREATE INDEX {RESPONSES_EMBEDDING_INDEX} ON {ASSISTANT_RESPONSES_TABLE} USING ivfflat (embedding vector_l2_ops)"
    )));
}

#[test]
fn fallback_branch_uses_jsonb_with_empty_array_and_no_ann_index() {
    let ddl = joined(&create_ddl(VectorSupport::Unavailable));
    assert!(ddl.contains("embedding jsonb DEFAULT '[]'::jsonb"));
    assert!(!ddl.contains("vector("));
    assert!(!ddl.contains("ivfflat"));
    assert!(!ddl.contains(RESPONSES_EMBEDDING_INDEX));
    assert!(!ddl.contains(ARTICLE_EMBEDDING_INDEX));
}

#[test]
fn both_embedding_tables_follow_vector_support() {
    for vector in [VectorSupport::Available, VectorSupport::Unavailable] {
        let responses = joined(&assistant_responses_ddl(vector));
        let articles = joined(&article_embeddings_ddl(vector));
        assert_eq!(responses.contains("ivfflat"), vector.is_available());
        assert_eq!(articles.contains("ivfflat"), vector.is_available());
        assert_eq!(articles.contains("vector(1536)"), vector.is_available());
    }
}

#[test]
fn legacy_table_and_index_tolerate_existing_objects() {
    let ddl = article_embeddings_ddl(VectorSupport::Available);
    assert_eq!(ddl.len(), 2);
    assert!(ddl[0].starts_with("CREATE TABLE IF NOT EXISTS article_embeddings"));
    assert!(ddl[1].starts_with(&format!("CREATE INDEX IF NOT EXISTS {ARTICLE_EMBEDDING_INDEX}")));
}

#[test]
fn unique_indexes_match_natural_keys() {
    let assistants = assistants_ddl();
    assert!(assistants.contains(
        &"CREATE UNIQUE INDEX index_captain_assistants_on_account_id_and_name ON captain_assistants (account_id, name)"
            .to_owned()
    ));

    let documents = documents_ddl();
    assert!(documents.contains(
        &"CREATE UNIQUE INDEX index_captain_documents_on_assistant_id_and_external_link ON captain_documents (assistant_id, external_link)"
            .to_owned()
    ));
    assert_eq!(documents.iter().filter(|s| s.starts_with("CREATE UNIQUE")).count(), 1);
}

#[test]
fn tables_are_created_in_dependency_order() {
    let ddl = create_ddl(VectorSupport::Unavailable);
    let position = |needle: &str| {
        ddl.iter().position(|s| s.starts_with(needle)).unwrap_or_else(|| panic!("{needle} missing"))
    };
    let assistants = position("CREATE TABLE captain_assistants");
    let documents = position("CREATE TABLE captain_documents");
    let responses = position("CREATE TABLE captain_assistant_responses");
    let articles = position("CREATE TABLE IF NOT EXISTS article_embeddings");
    assert!(assistants < documents && documents < responses && responses < articles);
}

#[test]
fn down_drops_every_created_table_in_reverse() {
    assert_eq!(
        DROP_ORDER,
        [
            "captain_assistant_responses",
            "captain_documents",
            "captain_assistants",
            "article_embeddings"
        ]
    );
}

#[test]
fn document_reference_on_responses_is_optional() {
    let ddl = &assistant_responses_ddl(VectorSupport::Unavailable)[0];
    assert!(ddl.contains("document_id bigint,"));
    assert!(ddl.contains("assistant_id bigint NOT NULL"));
    assert!(ddl.contains("account_id bigint NOT NULL"));
}
