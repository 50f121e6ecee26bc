//! Integration tests for the library graph
//!
//! Covers artists, albums, tracks and genres:
//! - Natural key uniqueness (album location, track filename, names)
//! - Foreign keys on tracks and album parents
//! - Album parent cycle rejection
//! - Normalized columns
//! - Derived counts


use gramophone_core::types::*;
use gramophone_core::{AudioFile, Error};
use gramophone_storage::{aggregates, albums, artists, genres, tracks};
use std::path::PathBuf;
use test_helpers::*;

// ============================================================================
// Artists
// ============================================================================

#[tokio::test]
async fn test_artist_name_folded_on_write() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let accented = create_test_artist(pool, "Sigur Rós").await;
    assert_eq!(accented.name_udec.as_deref(), Some("Sigur Ros"));
    assert_eq!(accented.index_name(), "Sigur Ros");

    let plain = create_test_artist(pool, "Radiohead").await;
    assert_eq!(plain.name_udec, None);
    assert_eq!(plain.index_name(), "Radiohead");
}

#[tokio::test]
async fn test_duplicate_artist_name_is_unique_violation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_artist(pool, "Björk").await;
    let err = artists::create(pool, CreateArtist::new("Björk")).await.unwrap_err();
    assert!(matches!(err, Error::UniqueViolation(_)), "got {err:?}");

    // get_or_create resolves to the existing row
    let existing = artists::get_or_create(pool, "Björk").await.unwrap();
    assert_eq!(count_rows(pool, "artists", "").await, 1);
    assert_eq!(existing.name, "Björk");
}

#[tokio::test]
async fn test_artists_sorted_by_index_name() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_artist(pool, "Zappa").await;
    create_test_artist(pool, "Ólafur Arnalds").await;
    create_test_artist(pool, "Muse").await;

    let names: Vec<String> = artists::get_all(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|artist| artist.name)
        .collect();

    assert_eq!(names, vec!["Muse", "Ólafur Arnalds", "Zappa"]);
}

// ============================================================================
// Albums
// ============================================================================

#[tokio::test]
async fn test_duplicate_album_location_is_unique_violation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_album(pool, "Kid A", None).await;
    let err = albums::create(
        pool,
        CreateAlbum {
            root_dir: "/music".to_string(),
            right_path: "Kid A".to_string(),
            ..CreateAlbum::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::UniqueViolation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_same_directory_name_under_other_root_is_allowed() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_album(pool, "Kid A", None).await;
    let other = albums::create(
        pool,
        CreateAlbum {
            root_dir: "/other".to_string(),
            right_path: "Kid A".to_string(),
            ..CreateAlbum::default()
        },
    )
    .await
    .unwrap();

    let found = albums::find_by_path(pool, &other.location()).await.unwrap();
    assert_eq!(found.map(|album| album.id), Some(other.id));
}

#[tokio::test]
async fn test_album_with_missing_parent_is_foreign_key_violation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = albums::create(
        pool,
        CreateAlbum {
            root_dir: "/music".to_string(),
            right_path: "Orphan".to_string(),
            parent_id: Some(999),
            ..CreateAlbum::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::ForeignKeyViolation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_album_parent_cycle_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let root = create_test_album(pool, "root", None).await;
    let child = create_test_album(pool, "child", Some(root.id)).await;
    let grandchild = create_test_album(pool, "grandchild", Some(child.id)).await;

    let err = albums::set_parent(pool, root.id, Some(grandchild.id)).await.unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(_)), "got {err:?}");

    let err = albums::set_parent(pool, root.id, Some(root.id)).await.unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(_)), "got {err:?}");

    // the rejected write left the tree untouched
    let root = albums::get_by_id(pool, root.id).await.unwrap().unwrap();
    assert_eq!(root.parent_id, None);

    // re-parenting sideways is fine
    albums::set_parent(pool, grandchild.id, Some(root.id)).await.unwrap();
    let children = albums::get_children(pool, root.id).await.unwrap();
    assert_eq!(children.len(), 2);
}

#[tokio::test]
async fn test_artists_strings_ordered_by_artist_id() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Split", None).await;
    let first = create_test_artist(pool, "first").await;
    let second = create_test_artist(pool, "second").await;
    let third = create_test_artist(pool, "third").await;

    // link in reverse of id order
    for artist in [&third, &first, &second] {
        albums::link_artist(pool, album.id, artist.id).await.unwrap();
    }
    albums::link_artist(pool, album.id, first.id).await.unwrap();

    let album = albums::get_with_relations(pool, album.id).await.unwrap();
    assert_eq!(album.artists.len(), 3);
    assert_eq!(album.artists_strings(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_album_update_refolds_title() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "dir", None).await;
    let updated = albums::update(
        pool,
        album.id,
        UpdateAlbum {
            tag_title: Some("Ágætis byrjun".to_string()),
            tag_year: Some(1999),
            ..UpdateAlbum::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.tag_title.as_deref(), Some("Ágætis byrjun"));
    assert_eq!(updated.tag_title_udec.as_deref(), Some("Agætis byrjun"));
    assert_eq!(updated.tag_year, Some(1999));

    let err = albums::update(pool, 999, UpdateAlbum::default()).await.unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Tracks
// ============================================================================

#[tokio::test]
async fn test_track_with_missing_album_is_foreign_key_violation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = tracks::create(
        pool,
        CreateTrack {
            album_id: 42,
            filename: "a.mp3".to_string(),
            ..CreateTrack::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::ForeignKeyViolation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_duplicate_track_filename_in_album() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Album", None).await;
    let other = create_test_album(pool, "Other", None).await;
    create_test_track(pool, album.id, "01.flac", 100).await;

    let err = tracks::create(
        pool,
        CreateTrack {
            album_id: album.id,
            filename: "01.flac".to_string(),
            ..CreateTrack::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::UniqueViolation(_)), "got {err:?}");

    // same filename in another album is a different track
    create_test_track(pool, other.id, "01.flac", 100).await;
}

#[tokio::test]
async fn test_track_paths_derived_from_album() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = albums::create(
        pool,
        CreateAlbum {
            root_dir: "/music".to_string(),
            left_path: "Radiohead".to_string(),
            right_path: "OK Computer".to_string(),
            ..CreateAlbum::default()
        },
    )
    .await
    .unwrap();
    let track = create_test_track(pool, album.id, "01 Airbag.mp3", 284).await;

    assert_eq!(
        track.abs_path(),
        Some(PathBuf::from("/music/Radiohead/OK Computer/01 Airbag.mp3"))
    );
    assert_eq!(
        track.rel_path(),
        Some(PathBuf::from("Radiohead/OK Computer/01 Airbag.mp3"))
    );
    assert_eq!(track.mime(), "audio/mpeg");
    assert_eq!(track.album_sid().to_string(), format!("al-{}", album.id));
}

#[tokio::test]
async fn test_tracks_ordered_by_disc_and_number() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Double", None).await;
    for (filename, disc, number) in [("d2t1", 2, 1), ("d1t2", 1, 2), ("d1t1", 1, 1)] {
        tracks::create(
            pool,
            CreateTrack {
                album_id: album.id,
                filename: filename.to_string(),
                tag_disc_number: Some(disc),
                tag_track_number: Some(number),
                ..CreateTrack::default()
            },
        )
        .await
        .unwrap();
    }

    let filenames: Vec<String> = tracks::get_by_album(pool, album.id)
        .await
        .unwrap()
        .into_iter()
        .map(|track| track.filename)
        .collect();

    assert_eq!(filenames, vec!["d1t1", "d1t2", "d2t1"]);
}

// ============================================================================
// Genres
// ============================================================================

#[tokio::test]
async fn test_genres_linked_in_row_order_and_idempotent() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Album", None).await;
    let track = create_test_track(pool, album.id, "t.ogg", 10).await;
    let rock = genres::get_or_create(pool, "rock").await.unwrap();
    let jazz = genres::get_or_create(pool, "jazz").await.unwrap();

    genres::add_to_album(pool, album.id, rock.id).await.unwrap();
    genres::add_to_album(pool, album.id, jazz.id).await.unwrap();
    genres::add_to_album(pool, album.id, rock.id).await.unwrap();
    genres::add_to_track(pool, track.id, jazz.id).await.unwrap();
    genres::add_to_track(pool, track.id, jazz.id).await.unwrap();

    let album = albums::get_with_relations(pool, album.id).await.unwrap();
    assert_eq!(album.genre_strings(), vec!["rock", "jazz"]);

    let track = tracks::get_with_genres(pool, track.id).await.unwrap();
    assert_eq!(track.genre_strings(), vec!["jazz"]);

    let err = genres::create(pool, "rock").await.unwrap_err();
    assert!(matches!(err, Error::UniqueViolation(_)), "got {err:?}");

    genres::remove_from_track(pool, track.id, jazz.id).await.unwrap();
    assert!(genres::get_by_track(pool, track.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_album_genre_unlinked() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Album", None).await;
    let rock = genres::get_or_create(pool, "rock").await.unwrap();
    genres::add_to_album(pool, album.id, rock.id).await.unwrap();

    genres::remove_from_album(pool, album.id, rock.id).await.unwrap();

    assert!(genres::get_by_album(pool, album.id).await.unwrap().is_empty());
    assert!(genres::get_by_id(pool, rock.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_album_roots_and_children() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let root = create_test_album(pool, "Artist", None).await;
    let second = create_test_album(pool, "Élan", Some(root.id)).await;
    let first = create_test_album(pool, "Début", Some(root.id)).await;

    let roots = albums::get_roots(pool).await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, root.id);

    let children: Vec<AlbumId> = albums::get_children(pool, root.id)
        .await
        .unwrap()
        .into_iter()
        .map(|album| album.id)
        .collect();
    assert_eq!(children, vec![first.id, second.id]);
    assert!(albums::get_children(pool, first.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_album_artist_unlinked() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Album", None).await;
    let artist = create_test_artist(pool, "Artist").await;
    albums::link_artist(pool, album.id, artist.id).await.unwrap();
    assert_eq!(artists::get_by_album(pool, album.id).await.unwrap().len(), 1);

    albums::unlink_artist(pool, album.id, artist.id).await.unwrap();

    assert!(artists::get_by_album(pool, album.id).await.unwrap().is_empty());
    assert!(artists::get_by_id(pool, artist.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_find_track_by_filename() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Album", None).await;
    let other = create_test_album(pool, "Other", None).await;
    let track = create_test_track(pool, album.id, "01 intro.flac", 60).await;

    let found = tracks::find_by_filename(pool, album.id, "01 intro.flac")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, track.id);

    assert!(tracks::find_by_filename(pool, other.id, "01 intro.flac")
        .await
        .unwrap()
        .is_none());
}

// ============================================================================
// Aggregates
// ============================================================================

#[tokio::test]
async fn test_album_stats() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let parent = create_test_album(pool, "parent", None).await;
    create_test_album(pool, "cd1", Some(parent.id)).await;
    create_test_album(pool, "cd2", Some(parent.id)).await;
    create_test_track(pool, parent.id, "a.flac", 100).await;
    create_test_track(pool, parent.id, "b.flac", 50).await;

    let stats = aggregates::album_stats(pool, parent.id).await.unwrap();
    assert_eq!(
        stats,
        AlbumStats {
            child_count: 2,
            track_count: 2,
            duration: 150,
        }
    );

    let empty = create_test_album(pool, "empty", None).await;
    assert_eq!(aggregates::album_duration(pool, empty.id).await.unwrap(), 0);
    assert_eq!(aggregates::album_track_count(pool, empty.id).await.unwrap(), 0);
    assert_eq!(aggregates::album_child_count(pool, parent.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_genre_and_artist_counts() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album = create_test_album(pool, "Album", None).await;
    let track = create_test_track(pool, album.id, "t.mp3", 1).await;
    let artist = create_test_artist(pool, "Artist").await;
    let genre = genres::get_or_create(pool, "ambient").await.unwrap();
    genres::get_or_create(pool, "unused").await.unwrap();

    genres::add_to_album(pool, album.id, genre.id).await.unwrap();
    genres::add_to_track(pool, track.id, genre.id).await.unwrap();
    albums::link_artist(pool, album.id, artist.id).await.unwrap();

    let counts = aggregates::genre_counts(pool).await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].genre.name, "ambient");
    assert_eq!((counts[0].album_count, counts[0].track_count), (1, 1));
    assert_eq!((counts[1].album_count, counts[1].track_count), (0, 0));

    assert_eq!(aggregates::artist_album_count(pool, artist.id).await.unwrap(), 1);
}
