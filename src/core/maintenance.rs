//! Maintenance ticket workflow.
//!
//! Tickets move Open -> In Progress -> Completed, may skip straight from Open to
//! Completed, and may drop back from In Progress to Open. Completed is terminal.
//! Every change (status, assignment, comment, photo) appends an event to the
//! ticket's timeline so the history of a ticket can be replayed from the row alone.
//! Changes read and rewrite the JSON columns inside one transaction.

use crate::{
    entities::{MaintenanceTicket, TicketPriority, TicketStatus, maintenance_ticket},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A comment left on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketComment {
    /// Identifier unique within the ticket (e.g., "c3")
    pub id: String,
    /// Comment body
    pub text: String,
    /// Who wrote it
    pub author: String,
    /// When it was written
    pub date: DateTime<Utc>,
}

/// A photo attached to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPhoto {
    /// Image location
    pub url: String,
    /// Short caption
    pub caption: String,
}

/// One entry in a ticket's audit timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// When it happened
    pub date: DateTime<Utc>,
    /// What happened (e.g., "Status changed")
    pub action: String,
    /// Who did it
    pub author: String,
    /// Extra detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Input for reporting a new ticket
#[derive(Debug, Clone)]
pub struct TicketInput {
    /// Property the work is for
    pub property_id: i64,
    /// Unit the work is for, if any
    pub unit_id: Option<i64>,
    /// Kind of task
    pub task_type: String,
    /// Trade or area
    pub category: Option<String>,
    /// Short summary
    pub title: String,
    /// Full description
    pub description: String,
    /// Urgency
    pub priority: TicketPriority,
    /// Day the problem was reported
    pub date_reported: NaiveDate,
    /// On-site contact name
    pub contact_name: Option<String>,
    /// On-site contact phone
    pub contact_phone: Option<String>,
    /// Who reported it; recorded on the first timeline event
    pub reported_by: String,
}

/// Optional filters for [`list_tickets`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketFilter {
    /// Only tickets for this property
    pub property_id: Option<i64>,
    /// Only tickets for this unit
    pub unit_id: Option<i64>,
    /// Only tickets in this status
    pub status: Option<TicketStatus>,
    /// Only tickets with this priority
    pub priority: Option<TicketPriority>,
}

/// Whether a ticket may move from `from` to `to`.
#[must_use]
pub const fn can_transition(from: TicketStatus, to: TicketStatus) -> bool {
    matches!(
        (from, to),
        (TicketStatus::Open, TicketStatus::InProgress | TicketStatus::Completed)
            | (TicketStatus::InProgress, TicketStatus::Completed | TicketStatus::Open)
    )
}

fn read_json_list<T: DeserializeOwned>(value: &Json) -> Result<Vec<T>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value.clone()).map_err(Into::into)
}

/// Reads the comments stored on a ticket.
pub fn comments_of(ticket: &maintenance_ticket::Model) -> Result<Vec<TicketComment>> {
    read_json_list(&ticket.comments)
}

/// Reads the photos stored on a ticket.
pub fn photos_of(ticket: &maintenance_ticket::Model) -> Result<Vec<TicketPhoto>> {
    read_json_list(&ticket.photos)
}

/// Reads the timeline stored on a ticket, oldest event first.
pub fn timeline_of(ticket: &maintenance_ticket::Model) -> Result<Vec<TimelineEvent>> {
    read_json_list(&ticket.timeline)
}

fn event(action: &str, author: &str, details: Option<String>) -> TimelineEvent {
    TimelineEvent {
        date: Utc::now(),
        action: action.to_string(),
        author: author.to_string(),
        details,
    }
}

fn require_text(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("Ticket {field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Opens a new ticket.
///
/// # Errors
/// Returns an error if:
/// - Title, description, task type or reporter is empty
/// - The property does not exist
/// - The unit does not exist or belongs to another property
pub async fn create_ticket(
    db: &DatabaseConnection,
    input: TicketInput,
) -> Result<maintenance_ticket::Model> {
    let title = require_text(&input.title, "title")?;
    let description = require_text(&input.description, "description")?;
    let task_type = require_text(&input.task_type, "task type")?;
    let reported_by = require_text(&input.reported_by, "reporter")?;

    crate::core::property::get_property_by_id(db, input.property_id)
        .await?
        .ok_or_else(|| Error::not_found("Property", input.property_id))?;

    if let Some(unit_id) = input.unit_id {
        let unit = crate::core::unit::get_unit_by_id(db, unit_id)
            .await?
            .ok_or_else(|| Error::not_found("Unit", unit_id))?;
        if unit.property_id != input.property_id {
            return Err(Error::validation(format!(
                "Unit {unit_id} does not belong to property {}",
                input.property_id
            )));
        }
    }

    let timeline = vec![event("Ticket created", &reported_by, Some(title.clone()))];

    let ticket = maintenance_ticket::ActiveModel {
        property_id: Set(input.property_id),
        unit_id: Set(input.unit_id),
        task_type: Set(task_type),
        category: Set(input.category),
        title: Set(title),
        description: Set(description),
        priority: Set(input.priority),
        status: Set(TicketStatus::Open),
        date_reported: Set(input.date_reported),
        assigned_to: Set(None),
        contact_name: Set(input.contact_name),
        contact_phone: Set(input.contact_phone),
        comments: Set(serde_json::json!([])),
        photos: Set(serde_json::json!([])),
        timeline: Set(serde_json::to_value(timeline)?),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    let ticket = ticket.insert(db).await?;
    tracing::info!(ticket_id = ticket.id, priority = ?ticket.priority, "Maintenance ticket opened");
    Ok(ticket)
}

/// Finds a ticket by id.
pub async fn get_ticket_by_id<C>(db: &C, ticket_id: i64) -> Result<Option<maintenance_ticket::Model>>
where
    C: ConnectionTrait,
{
    MaintenanceTicket::find_by_id(ticket_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_ticket<C>(db: &C, ticket_id: i64) -> Result<maintenance_ticket::Model>
where
    C: ConnectionTrait,
{
    get_ticket_by_id(db, ticket_id)
        .await?
        .ok_or_else(|| Error::not_found("MaintenanceTicket", ticket_id))
}

/// Moves a ticket to a new status and records it on the timeline.
pub async fn update_ticket_status(
    db: &DatabaseConnection,
    ticket_id: i64,
    status: TicketStatus,
    author: &str,
) -> Result<maintenance_ticket::Model> {
    let txn = db.begin().await?;
    let ticket = require_ticket(&txn, ticket_id).await?;

    if !can_transition(ticket.status, status) {
        return Err(Error::InvalidTransition {
            entity: "MaintenanceTicket",
            from: format!("{:?}", ticket.status),
            to: format!("{status:?}"),
        });
    }

    let mut timeline = timeline_of(&ticket)?;
    timeline.push(event(
        "Status changed",
        author,
        Some(format!("{:?} -> {status:?}", ticket.status)),
    ));

    let mut active: maintenance_ticket::ActiveModel = ticket.into();
    active.status = Set(status);
    active.timeline = Set(serde_json::to_value(timeline)?);
    let ticket = active.update(&txn).await?;

    txn.commit().await?;
    Ok(ticket)
}

/// Assigns a ticket to a person or vendor.
pub async fn assign_ticket(
    db: &DatabaseConnection,
    ticket_id: i64,
    assignee: &str,
    author: &str,
) -> Result<maintenance_ticket::Model> {
    let assignee = require_text(assignee, "assignee")?;
    let txn = db.begin().await?;
    let ticket = require_ticket(&txn, ticket_id).await?;

    if ticket.status == TicketStatus::Completed {
        return Err(Error::validation("Completed tickets cannot be reassigned"));
    }

    let mut timeline = timeline_of(&ticket)?;
    timeline.push(event("Assigned", author, Some(assignee.clone())));

    let mut active: maintenance_ticket::ActiveModel = ticket.into();
    active.assigned_to = Set(Some(assignee));
    active.timeline = Set(serde_json::to_value(timeline)?);
    let ticket = active.update(&txn).await?;

    txn.commit().await?;
    Ok(ticket)
}

/// Adds a comment to a ticket.
pub async fn add_comment(
    db: &DatabaseConnection,
    ticket_id: i64,
    author: &str,
    text: &str,
) -> Result<maintenance_ticket::Model> {
    let author = require_text(author, "comment author")?;
    let text = require_text(text, "comment")?;
    let txn = db.begin().await?;
    let ticket = require_ticket(&txn, ticket_id).await?;

    let mut comments = comments_of(&ticket)?;
    let mut timeline = timeline_of(&ticket)?;

    let comment = TicketComment {
        id: format!("c{}", comments.len() + 1),
        text,
        author: author.clone(),
        date: Utc::now(),
    };
    timeline.push(event("Comment added", &author, Some(comment.id.clone())));
    comments.push(comment);

    let mut active: maintenance_ticket::ActiveModel = ticket.into();
    active.comments = Set(serde_json::to_value(comments)?);
    active.timeline = Set(serde_json::to_value(timeline)?);
    let ticket = active.update(&txn).await?;

    txn.commit().await?;
    Ok(ticket)
}

/// Attaches a photo to a ticket and records it on the timeline.
pub async fn add_photo(
    db: &DatabaseConnection,
    ticket_id: i64,
    url: &str,
    caption: &str,
    author: &str,
) -> Result<maintenance_ticket::Model> {
    let url = require_text(url, "photo url")?;
    let txn = db.begin().await?;
    let ticket = require_ticket(&txn, ticket_id).await?;

    let mut photos = photos_of(&ticket)?;
    let mut timeline = timeline_of(&ticket)?;

    timeline.push(event("Photo added", author, Some(url.clone())));
    photos.push(TicketPhoto {
        url,
        caption: caption.trim().to_string(),
    });

    let mut active: maintenance_ticket::ActiveModel = ticket.into();
    active.photos = Set(serde_json::to_value(photos)?);
    active.timeline = Set(serde_json::to_value(timeline)?);
    let ticket = active.update(&txn).await?;

    txn.commit().await?;
    Ok(ticket)
}

/// Lists tickets matching `filter`, newest report first.
pub async fn list_tickets(
    db: &DatabaseConnection,
    filter: TicketFilter,
) -> Result<Vec<maintenance_ticket::Model>> {
    let mut query = MaintenanceTicket::find()
        .order_by_desc(maintenance_ticket::Column::DateReported)
        .order_by_desc(maintenance_ticket::Column::Id);

    if let Some(property_id) = filter.property_id {
        query = query.filter(maintenance_ticket::Column::PropertyId.eq(property_id));
    }
    if let Some(unit_id) = filter.unit_id {
        query = query.filter(maintenance_ticket::Column::UnitId.eq(unit_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(maintenance_ticket::Column::Status.eq(status));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(maintenance_ticket::Column::Priority.eq(priority));
    }

    query.all(db).await.map_err(Into::into)
}

/// Counts tickets that are not Completed, optionally for one property.
pub async fn count_open_tickets(db: &DatabaseConnection, property_id: Option<i64>) -> Result<u64> {
    let mut query = MaintenanceTicket::find()
        .filter(maintenance_ticket::Column::Status.ne(TicketStatus::Completed));
    if let Some(property_id) = property_id {
        query = query.filter(maintenance_ticket::Column::PropertyId.eq(property_id));
    }
    query.count(db).await.map_err(Into::into)
}
