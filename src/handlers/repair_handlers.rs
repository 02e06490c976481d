//! Repair ticket handlers: intake, public tracking, admin listing and
//! status updates.

use actix_web::{delete, get, patch, post, web, HttpMessage, HttpRequest, HttpResponse};

use crate::errors::{AppError, AppResult, RepositoryError};
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateTicketRequest, TicketStatusView, UpdateTicketRequest};
use crate::repository::TicketRepository;

/// Configure repair routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/repairs")
            .service(list_tickets)
            .service(track_ticket)
            .service(create_ticket)
            .service(update_ticket)
            .service(delete_ticket),
    );
}

/// Intake a new repair. Status always starts at PENDIENTE; when the body
/// carries no owner, the authenticated identity (if any) is used.
#[post("")]
async fn create_ticket(
    repo: web::Data<TicketRepository>,
    req: HttpRequest,
    body: web::Json<CreateTicketRequest>,
) -> AppResult<HttpResponse> {
    let (device_model, issue_description, contact_phone) = match (
        body.device_model.as_deref().filter(|s| !s.trim().is_empty()),
        body.issue_description
            .as_deref()
            .filter(|s| !s.trim().is_empty()),
        body.contact_phone.as_deref().filter(|s| !s.trim().is_empty()),
    ) {
        (Some(model), Some(issue), Some(phone)) => (model, issue, phone),
        _ => {
            return Err(AppError::ValidationError(
                "Missing required fields: device model, issue description or contact phone"
                    .to_string(),
            ))
        }
    };

    let owner = resolve_owner(&req, body.user_id);

    let ticket = repo
        .create(device_model, issue_description, contact_phone, owner)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Ticket created successfully",
        "ticket": ticket
    })))
}

/// Public tracking view by short ID.
#[get("/{id}")]
async fn track_ticket(
    repo: web::Data<TicketRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let ticket = repo.find_by_id(&id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::TicketNotFound(id.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(TicketStatusView {
        id: ticket.id,
        device_model: ticket.device_model,
        status: ticket.status,
        updated_at: ticket.updated_at,
        estimated_cost: ticket.estimated_cost,
        contact_phone: ticket.contact_phone,
    }))
}

/// Admin listing: all tickets, newest first, with their owning users.
#[get("")]
async fn list_tickets(repo: web::Data<TicketRepository>) -> AppResult<HttpResponse> {
    let tickets = repo.list_with_users().await?;

    Ok(HttpResponse::Ok().json(tickets))
}

/// Update status and/or estimated cost. Transitions are unconstrained: any
/// enumerated status may overwrite any other, including reverting a
/// delivered ticket.
#[patch("/{id}")]
async fn update_ticket(
    repo: web::Data<TicketRepository>,
    path: web::Path<String>,
    body: web::Json<UpdateTicketRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let ticket = repo
        .update(&id, body.status, body.estimated_cost)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::TicketNotFound(id.clone()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Ticket updated",
        "ticket": ticket
    })))
}

/// Delete a ticket.
#[delete("/{id}")]
async fn delete_ticket(
    repo: web::Data<TicketRepository>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    repo.delete(&id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::TicketNotFound(id.clone()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Ticket deleted" })))
}

/// Ticket owner: an explicit `userId` in the body wins, otherwise the
/// authenticated caller (if any).
fn resolve_owner(req: &HttpRequest, body_user_id: Option<i32>) -> Option<i32> {
    body_user_id.or_else(|| {
        req.extensions()
            .get::<AuthenticatedUser>()
            .map(|user| user.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use actix_web::test::TestRequest;

    #[test]
    fn owner_falls_back_to_authenticated_caller() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser {
            id: 9,
            role: Role::Cliente,
        });

        assert_eq!(resolve_owner(&req, None), Some(9));
        // An explicit body value still wins.
        assert_eq!(resolve_owner(&req, Some(3)), Some(3));
    }

    #[test]
    fn owner_absent_for_anonymous_intake() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(resolve_owner(&req, None), None);
        assert_eq!(resolve_owner(&req, Some(5)), Some(5));
    }
}
