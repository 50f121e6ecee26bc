
use gramophone_core::storage::SettingStore;
use gramophone_core::Error;
use gramophone_storage::{settings, LocalStorageContext};
use test_helpers::*;

fn random_key() -> String {
    format!("key-{}", rand::random::<u32>())
}

#[tokio::test]
async fn test_set_same_key_twice_keeps_one_row() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let key = random_key();

    settings::set_setting(pool, &key, "howdy").await.unwrap();
    settings::set_setting(pool, &key, "howdy").await.unwrap();

    assert_eq!(settings::get_setting(pool, &key).await.unwrap(), "howdy");
    assert_eq!(count_rows(pool, "settings", &format!("key = '{key}'")).await, 1);
}

#[tokio::test]
async fn test_set_overwrites_value() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    settings::set_setting(pool, "theme", "light").await.unwrap();
    settings::set_setting(pool, "theme", "dark").await.unwrap();

    assert_eq!(settings::get_setting(pool, "theme").await.unwrap(), "dark");
}

#[tokio::test]
async fn test_get_missing_setting_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = settings::get_setting(pool, "never-set").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    assert_eq!(settings::find_setting(pool, "never-set").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_all_and_delete() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    settings::set_setting(pool, settings::SETTING_LASTFM_SECRET, "s").await.unwrap();
    settings::set_setting(pool, settings::SETTING_LASTFM_API_KEY, "k").await.unwrap();

    let all = settings::get_all_settings(pool).await.unwrap();
    let keys: Vec<&str> = all.iter().map(|setting| setting.key.as_str()).collect();
    assert_eq!(keys, vec!["lastfm_api_key", "lastfm_secret"]);

    assert!(settings::delete_setting(pool, settings::SETTING_LASTFM_SECRET).await.unwrap());
    assert!(!settings::delete_setting(pool, settings::SETTING_LASTFM_SECRET).await.unwrap());
}

#[tokio::test]
async fn test_setting_store_through_context() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "alice").await;
    let context = LocalStorageContext::new(test_db.pool().clone(), user.id);

    context.set_setting("greeting", "howdy").await.unwrap();
    assert_eq!(context.get_setting("greeting").await.unwrap(), "howdy");
}
