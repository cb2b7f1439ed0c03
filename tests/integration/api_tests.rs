//! API integration tests
//!
//! Run against a live server with seeded defaults:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create an author, a book, a user, and a member; return (book_id, member_id)
async fn seed_loanable_book(client: &Client, tag: &str) -> (i64, i64) {
    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "lastname": format!("Author-{}", tag) }))
        .send()
        .await
        .expect("Failed to create author")
        .json()
        .await
        .expect("Failed to parse author response");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": format!("Book-{}", tag),
            "author_id": author["id"],
            "isbn": format!("isbn-{}", tag),
            "genre": "Fiction",
            "available_copies": 2
        }))
        .send()
        .await
        .expect("Failed to create book")
        .json()
        .await
        .expect("Failed to parse book response");

    let user: Value = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "username": format!("user-{}", tag),
            "email": format!("user-{}@example.org", tag)
        }))
        .send()
        .await
        .expect("Failed to create user")
        .json()
        .await
        .expect("Failed to parse user response");

    let member: Value = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "user_id": user["id"] }))
        .send()
        .await
        .expect("Failed to create member")
        .json()
        .await
        .expect("Failed to parse member response");

    (
        book["id"].as_i64().expect("No book id"),
        member["id"].as_i64().expect("No member id"),
    )
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_book_read_embeds_author() {
    let client = Client::new();
    let (book_id, _) = seed_loanable_book(&client, "embed").await;

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["author"]["lastname"], "Author-embed");
    // The write-only foreign key never appears on read
    assert!(body.get("author_id").is_none());
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle() {
    let client = Client::new();
    let (book_id, member_id) = seed_loanable_book(&client, "lifecycle").await;

    // Borrow
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "book_id": book_id, "member_id": member_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["id"].as_i64().expect("No loan id");
    assert!(body["due_date"].is_string());

    // Fresh loan is not overdue and dates are set
    let loan: Value = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(loan["is_returned"], false);
    assert_eq!(loan["is_overdue"], false);
    assert_eq!(loan["days_overdue"], 0);
    assert_eq!(loan["book"]["id"], book_id);
    assert_eq!(loan["member"]["id"], member_id);

    // Return
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "returned");
    assert_eq!(body["loan"]["is_returned"], true);
    assert!(body["loan"]["return_date"].is_string());

    // Returning twice conflicts
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_extend_due_date_bounds() {
    let client = Client::new();
    let (book_id, member_id) = seed_loanable_book(&client, "extend").await;

    let loan: Value = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "book_id": book_id, "member_id": member_id }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let loan_id = loan["id"].as_i64().expect("No loan id");

    for days in [0, -1, 31] {
        let response = client
            .post(format!("{}/loans/{}/extend", BASE_URL, loan_id))
            .json(&json!({ "additional_days": days }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 400, "additional_days={} must be rejected", days);
    }

    let response = client
        .post(format!("{}/loans/{}/extend", BASE_URL, loan_id))
        .json(&json!({ "additional_days": 30 }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("30"));
}

#[tokio::test]
#[ignore]
async fn test_remind_unknown_loan_reports_not_found() {
    let client = Client::new();

    let response = client
        .post(format!("{}/loans/999999999/remind", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    // A missing loan is an outcome, not an HTTP error
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "not_found");
}

#[tokio::test]
#[ignore]
async fn test_sweep_returns_summary() {
    let client = Client::new();

    let response = client
        .post(format!("{}/loans/sweep", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["scanned"].is_number());
    assert!(body["sent"].is_number());
    assert!(body["sent"].as_u64() <= body["scanned"].as_u64());
}
