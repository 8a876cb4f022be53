use super::*;

fn draft(name: &str, symptoms: &str) -> DiseaseDraft {
    DiseaseDraft::new(name, symptoms)
}

#[tokio::test]
async fn lists_diseases_newest_first() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let rabies = storage
        .insert_disease(&draft("Rabies", "fever,aggression"))
        .await
        .expect("insert rabies");
    let mange = storage
        .insert_disease(&draft("Mange", "itching"))
        .await
        .expect("insert mange");

    let diseases = storage.list_diseases().await.expect("list");
    let ids: Vec<_> = diseases.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![mange, rabies]);
    assert_eq!(diseases[1].symptoms, "fever,aggression");
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn update_replaces_fields_of_existing_row() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let id = storage
        .insert_disease(&draft("Distemper", "cough"))
        .await
        .expect("insert");

    let updated = storage
        .update_disease(id, &draft("Canine distemper", "cough, fever"))
        .await
        .expect("update");
    assert!(updated);

    let stored = storage.disease(id).await.expect("fetch").expect("row");
    assert_eq!(stored.name, "Canine distemper");
    assert_eq!(stored.symptoms, "cough, fever");
}

#[tokio::test]
async fn update_and_delete_report_missing_rows() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert!(!storage
        .update_disease(DiseaseId(404), &draft("x", "y"))
        .await
        .expect("update"));
    assert!(!storage
        .delete_disease(DiseaseId(404))
        .await
        .expect("delete"));
}

#[tokio::test]
async fn delete_removes_row() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let id = storage
        .insert_disease(&draft("Parvovirus", "vomiting"))
        .await
        .expect("insert");
    assert!(storage.delete_disease(id).await.expect("delete"));
    assert!(storage.list_diseases().await.expect("list").is_empty());
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}
