use crate::models::{Message, MessagingStats, Party, Priority, Role, User};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all store operations. This is the core
/// of the Repository Abstraction pattern: handlers interact with the data
/// layer without knowing the concrete implementation, so a persistent store
/// can be substituted for the in-memory one without touching any
/// authorization logic.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Directory ---
    // Retrieves a directory user by id. Used by authentication and recipient lookup.
    async fn get_user(&self, id: Uuid) -> Option<User>;
    // Resolves an email/password pair to a user, or None on any mismatch.
    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User>;
    // All directory users except the caller, sorted by name.
    async fn list_contacts(&self, exclude: Uuid) -> Vec<User>;

    // --- Messages ---
    // All messages where the user is sender or recipient, newest first.
    // The filter is the cross-user leakage boundary: nothing else is returned.
    async fn get_messages_for(&self, user_id: Uuid) -> Vec<Message>;
    async fn get_message(&self, id: Uuid) -> Option<Message>;
    // Appends a new message. Id and timestamp are assigned here, never by the caller;
    // the message always starts unread.
    async fn insert_message(
        &self,
        sender: Party,
        recipient: Party,
        subject: String,
        content: String,
        priority: Priority,
    ) -> Message;
    // Recipient-Only: flips the read latch. Idempotent; a second call is a no-op
    // that still returns the message. None if the id is absent or the user is
    // not the recipient.
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Option<Message>;
    // Removes a message by id. Returns true if a message was removed.
    async fn delete_message(&self, id: Uuid) -> bool;

    // --- Stats ---
    async fn get_stats(&self) -> MessagingStats;
}

/// RepositoryState
///
/// The concrete type used to share the store access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// DirectoryUser
///
/// A directory record together with its login credential. Only the in-memory
/// implementation stores passwords; a real persistence layer would hold hashes.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub user: User,
    pub password: String,
}

/// InMemoryRepository
///
/// The concrete implementation of the `Repository` trait backed by
/// process-local state: an immutable user directory seeded at construction,
/// and a message list behind a `tokio::sync::RwLock`.
///
/// The store has process lifetime and is discarded on restart; mutations are
/// safe without finer-grained coordination because mark-read is idempotent
/// and deletes match by id rather than position.
pub struct InMemoryRepository {
    // Directory by user id. Never mutated after construction.
    users: HashMap<Uuid, User>,
    // Login index: email -> (user id, password).
    credentials: HashMap<String, (Uuid, String)>,
    // Append-only except for explicit owner deletes.
    messages: RwLock<Vec<Message>>,
}

impl InMemoryRepository {
    /// Creates an empty store over the given directory.
    pub fn new(directory: Vec<DirectoryUser>) -> Self {
        let mut users = HashMap::new();
        let mut credentials = HashMap::new();
        for entry in directory {
            credentials.insert(
                entry.user.email.clone(),
                (entry.user.id, entry.password),
            );
            users.insert(entry.user.id, entry.user);
        }
        Self {
            users,
            credentials,
            messages: RwLock::new(Vec::new()),
        }
    }

    /// with_demo_data
    ///
    /// Builds the store with the GreenLands demo directory and a small seeded
    /// conversation, matching what the SPA expects on a fresh start. Seeded
    /// timestamps are relative to startup so the inbox always sorts sensibly.
    pub fn with_demo_data() -> Self {
        let farmer = User {
            id: Uuid::new_v4(),
            name: "John Smith".to_string(),
            email: "john.smith@greenlands.example".to_string(),
            role: Role::Farmer,
        };
        let official = User {
            id: Uuid::new_v4(),
            name: "Dr. Emily Wilson".to_string(),
            email: "emily.wilson@agri.gov.example".to_string(),
            role: Role::Government,
        };
        let analyst = User {
            id: Uuid::new_v4(),
            name: "Sarah Chen".to_string(),
            email: "sarah.chen@greenlands.example".to_string(),
            role: Role::Analyst,
        };
        let admin = User {
            id: Uuid::new_v4(),
            name: "Alex Morgan".to_string(),
            email: "admin@greenlands.example".to_string(),
            role: Role::Admin,
        };
        let staff = User {
            id: Uuid::new_v4(),
            name: "Liam O'Brien".to_string(),
            email: "liam.obrien@greenlands.example".to_string(),
            role: Role::Staff,
        };

        let directory = [&farmer, &official, &analyst, &admin, &staff]
            .into_iter()
            .map(|user| DirectoryUser {
                user: user.clone(),
                password: "greenlands".to_string(),
            })
            .collect();

        let mut repo = Self::new(directory);

        let now = Utc::now();
        let seeded = vec![
            Message {
                id: Uuid::new_v4(),
                sender: Party::from(&farmer),
                recipient: Party::from(&official),
                subject: "Subsidy Application Query".to_string(),
                content: "I have a question about the new subsidy program. Can you \
                          provide more details about the eligibility criteria?"
                    .to_string(),
                timestamp: now - Duration::hours(30),
                read: false,
                priority: Priority::Normal,
            },
            Message {
                id: Uuid::new_v4(),
                sender: Party::from(&official),
                recipient: Party::from(&farmer),
                subject: "Re: Subsidy Application Query".to_string(),
                content: "Thank you for your inquiry. The eligibility criteria include \
                          land size, crop type, and sustainable practices. Please check \
                          our website for detailed information."
                    .to_string(),
                timestamp: now - Duration::hours(26),
                read: true,
                priority: Priority::Normal,
            },
        ];

        // Construction-time seeding; no other task can hold the lock yet.
        repo.messages = RwLock::new(seeded);

        repo
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    /// get_user
    ///
    /// Retrieves directory data (id, name, email, role) needed for
    /// authentication and authorization.
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    /// verify_credentials
    ///
    /// Login check against the seeded credential index. The comparison is a
    /// straight equality on the demo password; a persistent implementation
    /// would verify a hash here.
    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User> {
        let (id, stored) = self.credentials.get(email)?;
        if stored != password {
            return None;
        }
        self.users.get(id).cloned()
    }

    /// list_contacts
    ///
    /// Every directory user except the caller, sorted by name for the
    /// compose-message picker.
    async fn list_contacts(&self, exclude: Uuid) -> Vec<User> {
        let mut contacts: Vec<User> = self
            .users
            .values()
            .filter(|user| user.id != exclude)
            .cloned()
            .collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        contacts
    }

    /// get_messages_for
    ///
    /// **Security**: strictly filters to messages where the user is a
    /// participant; this is the only listing path, so no cross-user leakage
    /// is possible regardless of store size.
    async fn get_messages_for(&self, user_id: Uuid) -> Vec<Message> {
        let messages = self.messages.read().await;
        let mut mine: Vec<Message> = messages
            .iter()
            .filter(|msg| msg.sender.id == user_id || msg.recipient.id == user_id)
            .cloned()
            .collect();
        // Newest first.
        mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        mine
    }

    /// get_message
    ///
    /// Simple retrieval by id with no ownership check; the calling handler is
    /// responsible for the participant check before releasing the body.
    async fn get_message(&self, id: Uuid) -> Option<Message> {
        let messages = self.messages.read().await;
        messages.iter().find(|msg| msg.id == id).cloned()
    }

    /// insert_message
    ///
    /// Appends a new message with a server-assigned id and timestamp.
    /// Insertion order under the write lock is what gives each sender's own
    /// messages their submission order.
    async fn insert_message(
        &self,
        sender: Party,
        recipient: Party,
        subject: String,
        content: String,
        priority: Priority,
    ) -> Message {
        let message = Message {
            id: Uuid::new_v4(),
            sender,
            recipient,
            subject,
            content,
            timestamp: Utc::now(),
            read: false,
            priority,
        };
        let mut messages = self.messages.write().await;
        messages.push(message.clone());
        message
    }

    /// mark_read
    ///
    /// Flips the one-way read latch, enforced by the **recipient-only**
    /// ownership check. Setting `read = true` twice has the same effect as
    /// once, which is what makes concurrent calls safe without a
    /// compare-and-swap.
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Option<Message> {
        let mut messages = self.messages.write().await;
        let message = messages
            .iter_mut()
            .find(|msg| msg.id == id && msg.recipient.id == recipient_id)?;
        message.read = true;
        Some(message.clone())
    }

    /// delete_message
    ///
    /// Removes by identifier match, not index position, so the removal stays
    /// correct if an append lands between the handler's find and this call.
    async fn delete_message(&self, id: Uuid) -> bool {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|msg| msg.id != id);
        messages.len() < before
    }

    /// get_stats
    ///
    /// Compiles all counters for the administrative dashboard in a single call.
    async fn get_stats(&self) -> MessagingStats {
        let messages = self.messages.read().await;
        MessagingStats {
            total_users: self.users.len() as i64,
            total_messages: messages.len() as i64,
            unread_messages: messages.iter().filter(|msg| !msg.read).count() as i64,
            high_priority_messages: messages
                .iter()
                .filter(|msg| msg.priority == Priority::High)
                .count() as i64,
        }
    }
}
