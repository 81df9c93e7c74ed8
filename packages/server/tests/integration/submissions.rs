use serde_json::json;

use crate::common::{TestApp, future_deadline, past_deadline, routes};

async fn approved_contest(app: &TestApp) -> i32 {
    app.insert_contest(
        "Logo Battle",
        "design",
        "approved",
        "cara@example.com",
        future_deadline(),
    )
    .await
}

#[tokio::test]
async fn a_paid_participant_can_submit() {
    let app = TestApp::spawn().await;
    let contest_id = approved_contest(&app).await;
    app.create_user("Alice", "alice@example.com").await;
    app.paid_entry(contest_id, "alice@example.com", "pi_s1").await;

    let token = app.token_for("alice@example.com").await;
    let res = app
        .post_with_token(
            routes::SUBMISSIONS,
            &json!({ "contestId": contest_id, "taskUrl": "https://drive.example.com/task" }),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "submission failed: {}", res.text);
    assert_eq!(res.body["participantEmail"], "alice@example.com");
    assert_eq!(res.body["participantName"], "Alice");
    assert_eq!(res.body["taskUrl"], "https://drive.example.com/task");
}

#[tokio::test]
async fn submitting_without_payment_is_forbidden() {
    let app = TestApp::spawn().await;
    let contest_id = approved_contest(&app).await;
    app.create_user("Alice", "alice@example.com").await;

    let token = app.token_for("alice@example.com").await;
    let res = app
        .post_with_token(
            routes::SUBMISSIONS,
            &json!({ "contestId": contest_id, "taskUrl": "https://drive.example.com/task" }),
            &token,
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn submissions_close_at_the_deadline() {
    let app = TestApp::spawn().await;
    let contest_id = approved_contest(&app).await;
    app.create_user("Alice", "alice@example.com").await;
    app.paid_entry(contest_id, "alice@example.com", "pi_s2").await;
    app.set_deadline(contest_id, past_deadline()).await;

    let token = app.token_for("alice@example.com").await;
    let res = app
        .post_with_token(
            routes::SUBMISSIONS,
            &json!({ "contestId": contest_id, "taskUrl": "https://drive.example.com/task" }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn a_non_http_task_url_is_rejected() {
    let app = TestApp::spawn().await;
    let contest_id = approved_contest(&app).await;
    app.create_user("Alice", "alice@example.com").await;

    let token = app.token_for("alice@example.com").await;
    let res = app
        .post_with_token(
            routes::SUBMISSIONS,
            &json!({ "contestId": contest_id, "taskUrl": "file:///etc/passwd" }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn the_contest_creator_lists_submissions() {
    let app = TestApp::spawn().await;
    let creator = app
        .create_user_with_role("Cara", "cara@example.com", "creator")
        .await;
    let contest_id = approved_contest(&app).await;
    app.create_user("Alice", "alice@example.com").await;
    app.paid_entry(contest_id, "alice@example.com", "pi_s3").await;

    let token = app.token_for("alice@example.com").await;
    let res = app
        .post_with_token(
            routes::SUBMISSIONS,
            &json!({ "contestId": contest_id, "taskUrl": "https://drive.example.com/task" }),
            &token,
        )
        .await;
    assert_eq!(res.status, 201);

    let listed = app
        .get_with_token(&routes::contest_submissions(contest_id), &creator)
        .await;

    assert_eq!(listed.status, 200);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["participantEmail"], "alice@example.com");
}

#[tokio::test]
async fn other_creators_cannot_read_the_submissions() {
    let app = TestApp::spawn().await;
    let contest_id = approved_contest(&app).await;
    let other = app
        .create_user_with_role("Evan", "evan@example.com", "creator")
        .await;

    let res = app
        .get_with_token(&routes::contest_submissions(contest_id), &other)
        .await;

    assert_eq!(res.status, 403);
}
