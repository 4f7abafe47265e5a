//! Behavior every store backend must share
//!
//! Each check takes an empty store and drives it through the trait methods
//! only. Backends call these from their own test modules.

use crate::{MovieStore, Store, StoreError, UserStore};
use chrono::NaiveDate;
use movie_core::{Director, Genre, Movie, User, UserChanges};

pub(crate) fn movie(id: &str, title: &str, genre: &str, director: &str) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        genre: vec![Genre {
            name: genre.to_string(),
            description: format!("{genre} films"),
        }],
        directors: vec![Director {
            name: director.to_string(),
            bio: String::new(),
            birth_year: None,
        }],
        actors: Vec::new(),
        description: format!("{title} description"),
        image_path: None,
        featured: None,
    }
}

pub(crate) fn user(name: &str) -> User {
    User::new(
        name.to_string(),
        "hash".to_string(),
        format!("{name}@example.com"),
        None,
    )
}

pub(crate) fn catalog() -> Vec<Movie> {
    vec![
        movie("m1", "Heat", "Crime", "Michael Mann"),
        movie("m2", "Collateral", "Crime", "Michael Mann"),
        movie("m3", "Alien", "Horror", "Ridley Scott"),
    ]
}

async fn seed<S: Store>(store: &S) {
    for movie in catalog() {
        store.put_movie(movie).await.unwrap();
    }
}

pub(crate) async fn movie_queries<S: Store>(store: &S) {
    seed(store).await;

    assert_eq!(store.list_movies().await.unwrap().len(), 3);
    assert_eq!(
        store.find_movie_by_title("Alien").await.unwrap().unwrap().id,
        "m3"
    );
    assert!(store.find_movie_by_title("alien").await.unwrap().is_none());
    assert_eq!(store.get_movie("m2").await.unwrap().unwrap().title, "Collateral");
    assert!(store.get_movie("nope").await.unwrap().is_none());

    let crime = store.find_movie_by_genre("Crime").await.unwrap().unwrap();
    assert!(crime.genre_named("Crime").is_some());
    assert!(store.find_movie_by_genre("Western").await.unwrap().is_none());

    let scott = store
        .find_movie_by_director("Ridley Scott")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scott.title, "Alien");
    assert!(store
        .find_movie_by_director("Ridley")
        .await
        .unwrap()
        .is_none());
}

pub(crate) async fn put_movie_replaces<S: Store>(store: &S) {
    seed(store).await;
    store
        .put_movie(movie("m1", "Heat (1995)", "Crime", "Michael Mann"))
        .await
        .unwrap();

    assert_eq!(store.list_movies().await.unwrap().len(), 3);
    assert_eq!(store.get_movie("m1").await.unwrap().unwrap().title, "Heat (1995)");
}

pub(crate) async fn duplicate_username_rejected<S: Store>(store: &S) {
    let created = store.create_user(user("moviefan1")).await.unwrap();
    assert_eq!(
        store.find_by_id(&created.id).await.unwrap().unwrap().username,
        "moviefan1"
    );

    let result = store.create_user(user("moviefan1")).await;
    assert!(matches!(result, Err(StoreError::DuplicateUsername(name)) if name == "moviefan1"));

    // Case-sensitive
    store.create_user(user("MovieFan1")).await.unwrap();
    assert_eq!(store.list_users().await.unwrap().len(), 2);
}

pub(crate) async fn update_user<S: Store>(store: &S) {
    let created = store.create_user(user("moviefan1")).await.unwrap();
    store.create_user(user("otherfan2")).await.unwrap();

    let birthday = NaiveDate::from_ymd_opt(1990, 5, 17);
    let updated = store
        .update_user(
            "moviefan1",
            UserChanges {
                username: Some("renamedfan".to_string()),
                password_hash: Some("rehashed".to_string()),
                email: Some("renamed@example.com".to_string()),
                birthday,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.username, "renamedfan");
    assert_eq!(updated.password_hash, "rehashed");
    assert_eq!(updated.email, "renamed@example.com");
    assert_eq!(updated.birthday, birthday);
    assert!(store.find_by_username("moviefan1").await.unwrap().is_none());

    // Only the supplied field changes
    let email_only = store
        .update_user(
            "renamedfan",
            UserChanges {
                email: Some("again@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(email_only.password_hash, "rehashed");
    assert_eq!(email_only.birthday, birthday);

    let clash = store
        .update_user(
            "renamedfan",
            UserChanges {
                username: Some("otherfan2".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(StoreError::DuplicateUsername(_))));

    let missing = store
        .update_user("ghostuser", UserChanges::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    let missing_onto_taken = store
        .update_user(
            "ghostuser",
            UserChanges {
                username: Some("otherfan2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(missing_onto_taken.is_none());
}

pub(crate) async fn delete_user<S: Store>(store: &S) {
    store.create_user(user("moviefan1")).await.unwrap();

    assert!(store.delete_user("moviefan1").await.unwrap());
    assert!(!store.delete_user("moviefan1").await.unwrap());
    assert!(store.find_by_username("moviefan1").await.unwrap().is_none());
}

pub(crate) async fn favorites<S: Store>(store: &S) {
    store.create_user(user("moviefan1")).await.unwrap();

    store.add_favorite("moviefan1", "m1").await.unwrap();
    let user = store.add_favorite("moviefan1", "m1").await.unwrap().unwrap();
    assert_eq!(user.favorite_movies, vec!["m1".to_string()]);

    let user = store
        .remove_favorite("moviefan1", "m2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.favorite_movies, vec!["m1".to_string()]);

    let user = store
        .remove_favorite("moviefan1", "m1")
        .await
        .unwrap()
        .unwrap();
    assert!(user.favorite_movies.is_empty());

    assert!(store.add_favorite("ghostuser", "m1").await.unwrap().is_none());
    assert!(store
        .remove_favorite("ghostuser", "m1")
        .await
        .unwrap()
        .is_none());
}
