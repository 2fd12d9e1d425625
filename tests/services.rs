use pushkind_posts::domain::types::{CommentBody, UserId};
use pushkind_posts::dto::posts::PostDetailsDto;
use pushkind_posts::forms::comments::AddCommentFormPayload;
use pushkind_posts::forms::posts::PostFormPayload;
use pushkind_posts::images::{DirectoryImageStore, InlineImageStore};
use pushkind_posts::repository::{DieselRepository, UserWriter};
use pushkind_posts::services::ServiceError;
use pushkind_posts::services::comments::add_comment;
use pushkind_posts::services::posts::{
    create_post, delete_post, edit_post, show_feed, show_post, update_post,
};

mod common;

fn owner() -> UserId {
    UserId::new(1).expect("valid user id")
}

fn stranger() -> UserId {
    UserId::new(2).expect("valid user id")
}

fn payload(description: &str, category_ids: &[i32], image: Option<&[u8]>) -> PostFormPayload {
    PostFormPayload {
        description: description.to_string(),
        category_ids: category_ids.to_vec(),
        image: image.map(<[u8]>::to_vec),
    }
}

fn comment(body: &str) -> AddCommentFormPayload {
    AddCommentFormPayload {
        body: CommentBody::new(body).expect("valid comment"),
    }
}

fn category_names(details: &PostDetailsDto) -> Vec<String> {
    let mut names = details
        .post
        .categories
        .iter()
        .map(|c| c.name.clone())
        .collect::<Vec<_>>();
    names.sort();
    names
}

#[test]
fn create_then_update_categories_scenario() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());

    let post_id = create_post(
        payload("hello", &[1, 2], Some(common::GIF)),
        owner(),
        &repo,
        &InlineImageStore,
    )
    .expect("should create post");

    let details = show_post(post_id.get(), &repo).expect("should show post");
    assert_eq!(details.post.description, "hello");
    assert_eq!(category_names(&details), vec!["A", "B"]);

    update_post(
        post_id.get(),
        owner(),
        payload("hello", &[2, 3], None),
        &repo,
        &InlineImageStore,
    )
    .expect("should update post");

    let details = show_post(post_id.get(), &repo).expect("should show post");
    assert_eq!(category_names(&details), vec!["B", "C"]);
    assert!(details.post.image.starts_with("data:image/gif;base64,"));
}

#[test]
fn repeated_update_is_idempotent_on_links() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = create_post(
        payload("hello", &[1], Some(common::GIF)),
        owner(),
        &repo,
        &InlineImageStore,
    )
    .expect("should create post");

    for _ in 0..2 {
        update_post(
            post_id.get(),
            owner(),
            payload("hello", &[3, 4, 3], None),
            &repo,
            &InlineImageStore,
        )
        .expect("should update post");
        let details = show_post(post_id.get(), &repo).expect("should show post");
        assert_eq!(category_names(&details), vec!["C", "D"]);
    }
}

#[test]
fn cardinality_is_enforced_end_to_end() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());

    for ids in [&[][..], &[1, 2, 3, 4][..]] {
        let err = create_post(
            payload("hello", ids, Some(common::GIF)),
            owner(),
            &repo,
            &InlineImageStore,
        )
        .expect_err("should reject selection");
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    for ids in [&[1][..], &[1, 2][..], &[1, 2, 3][..]] {
        create_post(
            payload("hello", ids, Some(common::GIF)),
            owner(),
            &repo,
            &InlineImageStore,
        )
        .expect("should accept selection");
    }

    assert_eq!(show_feed(&repo).expect("feed").len(), 3);
}

#[test]
fn non_owner_cannot_edit_update_or_delete() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = create_post(
        payload("hello", &[1, 2], Some(common::GIF)),
        owner(),
        &repo,
        &InlineImageStore,
    )
    .expect("should create post");
    let before = show_post(post_id.get(), &repo).expect("should show post");

    assert_eq!(
        edit_post(post_id.get(), stranger(), &repo).expect_err("edit"),
        ServiceError::Forbidden
    );
    assert_eq!(
        update_post(
            post_id.get(),
            stranger(),
            payload("mine now", &[3], None),
            &repo,
            &InlineImageStore,
        )
        .expect_err("update"),
        ServiceError::Forbidden
    );
    assert_eq!(
        delete_post(post_id.get(), stranger(), &repo, &InlineImageStore).expect_err("delete"),
        ServiceError::Forbidden
    );

    assert_eq!(show_post(post_id.get(), &repo).expect("still there"), before);
}

#[test]
fn deleted_post_is_not_found() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = create_post(
        payload("hello", &[1], Some(common::GIF)),
        owner(),
        &repo,
        &InlineImageStore,
    )
    .expect("should create post");

    delete_post(post_id.get(), owner(), &repo, &InlineImageStore).expect("should delete");

    assert_eq!(
        show_post(post_id.get(), &repo).expect_err("gone"),
        ServiceError::NotFound {
            entity: "post",
            id: post_id.get()
        }
    );
}

#[test]
fn directory_store_keeps_files_in_sync_with_posts() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let dir = tempfile::tempdir().expect("temp dir");
    let store = DirectoryImageStore::new(dir.path(), "/uploads").expect("store");

    let post_id = create_post(
        payload("hello", &[1], Some(common::GIF)),
        owner(),
        &repo,
        &store,
    )
    .expect("should create post");

    let image = show_post(post_id.get(), &repo).expect("show").post.image;
    let file_name = image.strip_prefix("/uploads/").expect("public url");
    assert!(dir.path().join(file_name).exists());

    delete_post(post_id.get(), owner(), &repo, &store).expect("should delete");
    assert!(!dir.path().join(file_name).exists());
}

#[test]
fn deactivated_user_cannot_post_or_comment() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = create_post(
        payload("hello", &[1], Some(common::GIF)),
        owner(),
        &repo,
        &InlineImageStore,
    )
    .expect("should create post");

    repo.set_user_active(stranger(), false).expect("should deactivate");

    assert_eq!(
        create_post(
            payload("still here", &[1], Some(common::GIF)),
            stranger(),
            &repo,
            &InlineImageStore,
        )
        .expect_err("create"),
        ServiceError::Unauthorized
    );
    assert_eq!(
        add_comment(post_id.get(), stranger(), comment("hi"), &repo).expect_err("comment"),
        ServiceError::Unauthorized
    );
    assert_eq!(show_feed(&repo).expect("feed").len(), 1);
    assert!(show_post(post_id.get(), &repo).expect("show").comments.is_empty());

    repo.set_user_active(stranger(), true).expect("should activate");
    add_comment(post_id.get(), stranger(), comment("hi"), &repo).expect("should comment");
}

#[test]
fn unknown_session_user_is_unauthorized() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());

    let err = create_post(
        payload("hello", &[1], Some(common::GIF)),
        UserId::new(77).expect("valid user id"),
        &repo,
        &InlineImageStore,
    )
    .expect_err("should reject unknown user");

    assert_eq!(err, ServiceError::Unauthorized);
    assert!(show_feed(&repo).expect("feed").is_empty());
}

#[test]
fn feed_shows_three_oldest_comments_and_total() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = create_post(
        payload("hello", &[1], Some(common::GIF)),
        owner(),
        &repo,
        &InlineImageStore,
    )
    .expect("should create post");

    for body in ["first", "second", "third", "fourth", "fifth"] {
        add_comment(post_id.get(), stranger(), comment(body), &repo).expect("should comment");
    }

    let feed = show_feed(&repo).expect("feed");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].comment_count, 5);
    assert_eq!(
        feed[0]
            .comments
            .iter()
            .map(|c| c.body.as_str())
            .collect::<Vec<_>>(),
        ["first", "second", "third"]
    );
    assert!(
        feed[0]
            .comments
            .iter()
            .all(|c| c.author.as_deref() == Some("Stranger"))
    );
}
