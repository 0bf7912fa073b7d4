use greenlands_portal::{
    models::{Party, Priority, Role, User},
    repository::{DirectoryUser, InMemoryRepository, Repository},
};
use uuid::Uuid;

// --- Test Data Helpers ---

fn test_user(name: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase().replace(' ', ".")),
        role,
    }
}

fn test_repo() -> (InMemoryRepository, User, User, User) {
    let alice = test_user("Alice", Role::Farmer);
    let bob = test_user("Bob", Role::Government);
    let carol = test_user("Carol", Role::Analyst);

    let directory = vec![alice.clone(), bob.clone(), carol.clone()]
        .into_iter()
        .map(|user| DirectoryUser {
            user,
            password: "pw".to_string(),
        })
        .collect();

    (InMemoryRepository::new(directory), alice, bob, carol)
}

async fn send(
    repo: &InMemoryRepository,
    from: &User,
    to: &User,
    subject: &str,
) -> greenlands_portal::models::Message {
    repo.insert_message(
        Party::from(from),
        Party::from(to),
        subject.to_string(),
        "content".to_string(),
        Priority::Normal,
    )
    .await
}

// --- Tests ---

#[tokio::test]
async fn test_insert_assigns_server_fields() {
    let (repo, alice, bob, _) = test_repo();
    let before = chrono::Utc::now();

    let msg = send(&repo, &alice, &bob, "hi").await;

    assert!(!msg.read, "new messages always start unread");
    assert!(msg.timestamp >= before, "timestamp is assigned at insertion");
    assert_eq!(repo.get_message(msg.id).await.unwrap().id, msg.id);
}

#[tokio::test]
async fn test_list_is_participant_scoped_and_newest_first() {
    let (repo, alice, bob, carol) = test_repo();

    let first = send(&repo, &alice, &bob, "first").await;
    let second = send(&repo, &bob, &alice, "second").await;
    // Not Alice's message; must never show up for her
    send(&repo, &bob, &carol, "other").await;

    let inbox = repo.get_messages_for(alice.id).await;
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].id, second.id);
    assert_eq!(inbox[1].id, first.id);
}

#[tokio::test]
async fn test_mark_read_is_recipient_scoped() {
    let (repo, alice, bob, carol) = test_repo();
    let msg = send(&repo, &alice, &bob, "hi").await;

    // Neither the sender nor a third party can flip the latch
    assert!(repo.mark_read(msg.id, alice.id).await.is_none());
    assert!(repo.mark_read(msg.id, carol.id).await.is_none());
    assert!(!repo.get_message(msg.id).await.unwrap().read);

    // The recipient can
    let updated = repo.mark_read(msg.id, bob.id).await.unwrap();
    assert!(updated.read);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let (repo, alice, bob, _) = test_repo();
    let msg = send(&repo, &alice, &bob, "hi").await;

    let once = repo.mark_read(msg.id, bob.id).await.unwrap();
    let twice = repo.mark_read(msg.id, bob.id).await.unwrap();

    assert!(once.read);
    assert!(twice.read);
    assert_eq!(once.id, twice.id);
}

#[tokio::test]
async fn test_delete_matches_by_id_not_position() {
    let (repo, alice, bob, _) = test_repo();

    let first = send(&repo, &alice, &bob, "first").await;
    let second = send(&repo, &alice, &bob, "second").await;

    assert!(repo.delete_message(first.id).await);
    // Deleting again reports nothing removed
    assert!(!repo.delete_message(first.id).await);

    // The other message is untouched
    assert!(repo.get_message(second.id).await.is_some());
    assert!(repo.get_message(first.id).await.is_none());
}

#[tokio::test]
async fn test_contacts_sorted_and_excluding_caller() {
    let (repo, alice, _, _) = test_repo();

    let contacts = repo.list_contacts(alice.id).await;
    let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol"]);
}

#[tokio::test]
async fn test_verify_credentials() {
    let (repo, alice, _, _) = test_repo();

    assert!(repo.verify_credentials(&alice.email, "pw").await.is_some());
    assert!(repo.verify_credentials(&alice.email, "nope").await.is_none());
    assert!(repo.verify_credentials("ghost@test.com", "pw").await.is_none());
}

#[tokio::test]
async fn test_stats_counts() {
    let (repo, alice, bob, _) = test_repo();

    let read_one = send(&repo, &alice, &bob, "a").await;
    send(&repo, &alice, &bob, "b").await;
    repo.insert_message(
        Party::from(&bob),
        Party::from(&alice),
        "urgent".to_string(),
        "content".to_string(),
        Priority::High,
    )
    .await;
    repo.mark_read(read_one.id, bob.id).await.unwrap();

    let stats = repo.get_stats().await;
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_messages, 3);
    assert_eq!(stats.unread_messages, 2);
    assert_eq!(stats.high_priority_messages, 1);
}

#[tokio::test]
async fn test_demo_data_seeds_directory_and_conversation() {
    let repo = InMemoryRepository::with_demo_data();

    let stats = repo.get_stats().await;
    assert_eq!(stats.total_users, 5);
    assert_eq!(stats.total_messages, 2);
    // The seeded thread has one unread message (the farmer's question)
    assert_eq!(stats.unread_messages, 1);
}
