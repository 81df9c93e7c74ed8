use serde_json::json;

use crate::common::{TestApp, future_deadline, past_deadline, routes};

fn valid_contest_body(name: &str, contest_type: &str) -> serde_json::Value {
    json!({
        "name": name,
        "image": "https://img.example/c.png",
        "description": "A contest description in **Markdown**.",
        "price": 19.99,
        "prize": "$500",
        "taskInstruction": "Submit a vector file",
        "type": contest_type,
        "tags": ["logo", "brand"],
        "deadline": "2099-01-01T00:00:00Z",
    })
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn a_creator_can_create_a_contest() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;

        let res = app
            .post_with_token(routes::CONTESTS, &valid_contest_body("Logo Battle", "design"), &token)
            .await;

        assert_eq!(res.status, 201, "create failed: {}", res.text);
        assert_eq!(res.body["name"], "Logo Battle");
        assert_eq!(res.body["status"], "pending");
        assert_eq!(res.body["participationCount"], 0);
        assert_eq!(res.body["creator"]["email"], "cara@example.com");
        assert_eq!(res.body["type"], "design");
    }

    #[tokio::test]
    async fn a_plain_user_cannot_create_a_contest() {
        let app = TestApp::spawn().await;
        app.create_user("Alice", "alice@example.com").await;
        let token = app.token_for("alice@example.com").await;

        let res = app
            .post_with_token(routes::CONTESTS, &valid_contest_body("Nope", "design"), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;

        let mut body = valid_contest_body("X", "design");
        body["name"] = json!("   ");
        let res = app.post_with_token(routes::CONTESTS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn only_approved_contests_are_listed() {
        let app = TestApp::spawn().await;
        app.insert_contest("Pending", "design", "pending", "c@example.com", future_deadline())
            .await;
        app.insert_contest("Live", "design", "approved", "c@example.com", future_deadline())
            .await;

        let res = app.get_without_token(routes::CONTESTS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 1);
        assert_eq!(res.body["result"][0]["name"], "Live");
    }

    #[tokio::test]
    async fn pagination_defaults_to_ten_per_page() {
        let app = TestApp::spawn().await;
        for i in 0..15 {
            app.insert_contest(
                &format!("Contest {i}"),
                "design",
                "approved",
                "c@example.com",
                future_deadline(),
            )
            .await;
        }

        let page1 = app.get_without_token(routes::CONTESTS).await;
        assert_eq!(page1.status, 200);
        assert_eq!(page1.body["count"], 15);
        assert_eq!(page1.body["result"].as_array().unwrap().len(), 10);

        let page2 = app
            .get_without_token(&format!("{}?page=2&limit=10", routes::CONTESTS))
            .await;
        assert_eq!(page2.body["count"], 15);
        assert_eq!(page2.body["result"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn search_matches_the_category_case_insensitively() {
        let app = TestApp::spawn().await;
        app.insert_contest("A", "Graphic Design", "approved", "c@example.com", future_deadline())
            .await;
        app.insert_contest("B", "writing", "approved", "c@example.com", future_deadline())
            .await;

        let res = app
            .get_without_token(&format!("{}?search=DESIGN", routes::CONTESTS))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 1);
        assert_eq!(res.body["result"][0]["name"], "A");
    }

    #[tokio::test]
    async fn type_filters_exactly() {
        let app = TestApp::spawn().await;
        app.insert_contest("A", "design", "approved", "c@example.com", future_deadline())
            .await;
        app.insert_contest("B", "graphic design", "approved", "c@example.com", future_deadline())
            .await;

        let res = app
            .get_without_token(&format!("{}?type=design", routes::CONTESTS))
            .await;

        assert_eq!(res.body["count"], 1);
        assert_eq!(res.body["result"][0]["name"], "A");
    }

    #[tokio::test]
    async fn popular_returns_the_six_most_entered() {
        let app = TestApp::spawn().await;
        for i in 0..8 {
            let id = app
                .insert_contest(
                    &format!("Contest {i}"),
                    "design",
                    "approved",
                    "c@example.com",
                    future_deadline(),
                )
                .await;
            app.set_participation_count(id, i).await;
        }

        let res = app.get_without_token(routes::POPULAR).await;

        assert_eq!(res.status, 200);
        let result = res.body.as_array().unwrap();
        assert_eq!(result.len(), 6);
        assert_eq!(result[0]["participationCount"], 7);
        assert_eq!(result[5]["participationCount"], 2);
    }

    #[tokio::test]
    async fn a_missing_contest_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::contest(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn a_creator_can_update_their_own_contest() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        let id = app
            .insert_contest("Old Name", "design", "pending", "cara@example.com", future_deadline())
            .await;

        let res = app
            .put_with_token(&routes::contest(id), &valid_contest_body("New Name", "art"), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "New Name");
        assert_eq!(res.body["type"], "art");
        assert_eq!(res.body["status"], "pending");
    }

    #[tokio::test]
    async fn another_creator_cannot_touch_it() {
        let app = TestApp::spawn().await;
        app.create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        let other = app
            .create_user_with_role("Evan", "evan@example.com", "creator")
            .await;
        let id = app
            .insert_contest("Mine", "design", "pending", "cara@example.com", future_deadline())
            .await;

        let res = app
            .put_with_token(&routes::contest(id), &valid_contest_body("Stolen", "art"), &other)
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn a_pending_contest_can_be_deleted_by_its_creator() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        let id = app
            .insert_contest("Mine", "design", "pending", "cara@example.com", future_deadline())
            .await;

        let res = app.delete_with_token(&routes::contest(id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_without_token(&routes::contest(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn an_approved_contest_cannot_be_deleted_by_its_creator() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        let id = app
            .insert_contest("Live", "design", "approved", "cara@example.com", future_deadline())
            .await;

        let res = app.delete_with_token(&routes::contest(id), &token).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn creators_see_their_own_contests_pending_included() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        app.insert_contest("Mine 1", "design", "pending", "cara@example.com", future_deadline())
            .await;
        app.insert_contest("Mine 2", "design", "approved", "cara@example.com", future_deadline())
            .await;
        app.insert_contest("Other", "design", "approved", "evan@example.com", future_deadline())
            .await;

        let res = app
            .get_with_token(&routes::creator_contests("cara@example.com"), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }
}

mod moderation {
    use super::*;

    #[tokio::test]
    async fn admins_see_pending_contests() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("Admin", "admin@example.com", "admin")
            .await;
        app.insert_contest("Pending", "design", "pending", "c@example.com", future_deadline())
            .await;

        let res = app.get_with_token(routes::ADMIN_CONTESTS, &admin).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approval_publishes_a_contest() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("Admin", "admin@example.com", "admin")
            .await;
        let id = app
            .insert_contest("Pending", "design", "pending", "c@example.com", future_deadline())
            .await;

        let res = app
            .patch_with_token(&routes::admin_contest(id), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "approved");

        let listed = app.get_without_token(routes::CONTESTS).await;
        assert_eq!(listed.body["count"], 1);
    }

    #[tokio::test]
    async fn approval_is_idempotent() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("Admin", "admin@example.com", "admin")
            .await;
        let id = app
            .insert_contest("Live", "design", "approved", "c@example.com", future_deadline())
            .await;

        let res = app
            .patch_with_token(&routes::admin_contest(id), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "approved");
    }

    #[tokio::test]
    async fn admins_can_remove_any_contest() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("Admin", "admin@example.com", "admin")
            .await;
        let id = app
            .insert_contest("Live", "design", "approved", "c@example.com", future_deadline())
            .await;
        app.paid_entry(id, "alice@example.com", "pi_mod_1").await;

        let res = app.delete_with_token(&routes::admin_contest(id), &admin).await;
        assert_eq!(res.status, 204);

        let res = app.get_without_token(&routes::contest(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn moderation_requires_the_admin_role() {
        let app = TestApp::spawn().await;
        let creator = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        let id = app
            .insert_contest("Pending", "design", "pending", "cara@example.com", future_deadline())
            .await;

        let res = app
            .patch_with_token(&routes::admin_contest(id), &json!({}), &creator)
            .await;

        assert_eq!(res.status, 403);
    }
}

mod winner {
    use super::*;

    /// Approved contest with a paid, submitted participant and an expired
    /// deadline — ready for a winner declaration.
    async fn judged_contest(app: &TestApp) -> (String, i32, i32) {
        let creator = app
            .create_user_with_role("Cara", "cara@example.com", "creator")
            .await;
        let participant_id = app.create_user("Alice", "alice@example.com").await;
        let contest_id = app
            .insert_contest("Judged", "design", "approved", "cara@example.com", future_deadline())
            .await;

        app.paid_entry(contest_id, "alice@example.com", "pi_win_1").await;

        let alice = app.token_for("alice@example.com").await;
        let res = app
            .post_with_token(
                routes::SUBMISSIONS,
                &json!({ "contestId": contest_id, "taskUrl": "https://drive.example.com/x" }),
                &alice,
            )
            .await;
        assert_eq!(res.status, 201, "submission failed: {}", res.text);

        app.set_deadline(contest_id, past_deadline()).await;

        (creator, contest_id, participant_id)
    }

    #[tokio::test]
    async fn the_creator_declares_a_submitted_participant() {
        let app = TestApp::spawn().await;
        let (creator, contest_id, participant_id) = judged_contest(&app).await;

        let res = app
            .patch_with_token(
                &routes::contest_winner(contest_id),
                &json!({ "winnerId": participant_id }),
                &creator,
            )
            .await;

        assert_eq!(res.status, 200, "declare failed: {}", res.text);
        assert_eq!(res.body["winnerId"], participant_id);
    }

    #[tokio::test]
    async fn a_winner_is_declared_only_once() {
        let app = TestApp::spawn().await;
        let (creator, contest_id, participant_id) = judged_contest(&app).await;

        let first = app
            .patch_with_token(
                &routes::contest_winner(contest_id),
                &json!({ "winnerId": participant_id }),
                &creator,
            )
            .await;
        assert_eq!(first.status, 200);

        let second = app
            .patch_with_token(
                &routes::contest_winner(contest_id),
                &json!({ "winnerId": participant_id }),
                &creator,
            )
            .await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn declaring_before_the_deadline_is_rejected() {
        let app = TestApp::spawn().await;
        let (creator, contest_id, participant_id) = judged_contest(&app).await;
        app.set_deadline(contest_id, future_deadline()).await;

        let res = app
            .patch_with_token(
                &routes::contest_winner(contest_id),
                &json!({ "winnerId": participant_id }),
                &creator,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn the_winner_must_have_submitted() {
        let app = TestApp::spawn().await;
        let (creator, contest_id, _) = judged_contest(&app).await;
        let outsider = app.create_user("Oscar", "oscar@example.com").await;

        let res = app
            .patch_with_token(
                &routes::contest_winner(contest_id),
                &json!({ "winnerId": outsider }),
                &creator,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn won_contests_are_listed_by_winner_email() {
        let app = TestApp::spawn().await;
        let (creator, contest_id, participant_id) = judged_contest(&app).await;

        let res = app
            .patch_with_token(
                &routes::contest_winner(contest_id),
                &json!({ "winnerId": participant_id }),
                &creator,
            )
            .await;
        assert_eq!(res.status, 200);

        let alice = app.token_for("alice@example.com").await;
        let won = app
            .get_with_token(&routes::won_contests("alice@example.com"), &alice)
            .await;

        assert_eq!(won.status, 200);
        assert_eq!(won.body.as_array().unwrap().len(), 1);
        assert_eq!(won.body[0]["name"], "Judged");
    }
}

mod registered {
    use super::*;

    #[tokio::test]
    async fn paid_contests_show_up_as_registered() {
        let app = TestApp::spawn().await;
        let id = app
            .insert_contest("Entered", "design", "approved", "c@example.com", future_deadline())
            .await;
        app.insert_contest("Not entered", "design", "approved", "c@example.com", future_deadline())
            .await;
        app.paid_entry(id, "alice@example.com", "pi_reg_1").await;

        let alice = app.token_for("alice@example.com").await;
        let res = app
            .get_with_token(&routes::registered_contests("alice@example.com"), &alice)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 1);
        assert_eq!(res.body[0]["name"], "Entered");
    }

    #[tokio::test]
    async fn someone_elses_registrations_are_off_limits() {
        let app = TestApp::spawn().await;
        let mallory = app.token_for("mallory@example.com").await;

        let res = app
            .get_with_token(&routes::registered_contests("alice@example.com"), &mallory)
            .await;

        assert_eq!(res.status, 403);
    }
}
