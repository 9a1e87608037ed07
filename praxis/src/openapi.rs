//! OpenAPI documentation for the `/api/*` surface.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api;

/// Session cookie security scheme.
struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "SessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("praxis_session"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "Practice management API")
    ),
    modifiers(&SessionAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::current_user,
        api::handlers::clients::list_clients,
        api::handlers::clients::create_client,
        api::handlers::clients::get_client,
        api::handlers::clients::update_client,
        api::handlers::clients::delete_client,
        api::handlers::contacts::list_contacts,
        api::handlers::contacts::create_contact,
        api::handlers::contacts::get_contact,
        api::handlers::contacts::update_contact,
        api::handlers::contacts::delete_contact,
        api::handlers::deals::list_deals,
        api::handlers::deals::create_deal,
        api::handlers::deals::get_deal,
        api::handlers::deals::update_deal,
        api::handlers::deals::delete_deal,
        api::handlers::proposals::list_proposals,
        api::handlers::proposals::create_proposal,
        api::handlers::proposals::get_proposal,
        api::handlers::proposals::update_proposal,
        api::handlers::proposals::delete_proposal,
        api::handlers::proposals::send_proposal,
        api::handlers::proposals::sign_proposal,
        api::handlers::contracts::list_contracts,
        api::handlers::contracts::create_contract,
        api::handlers::contracts::get_contract,
        api::handlers::contracts::update_contract,
        api::handlers::contracts::delete_contract,
        api::handlers::contracts::send_contract,
        api::handlers::contracts::sign_contract,
        api::handlers::engagements::list_engagements,
        api::handlers::engagements::create_engagement,
        api::handlers::engagements::get_engagement,
        api::handlers::engagements::update_engagement,
        api::handlers::engagements::delete_engagement,
        api::handlers::projects::list_projects,
        api::handlers::projects::create_project,
        api::handlers::projects::get_project,
        api::handlers::projects::update_project,
        api::handlers::projects::delete_project,
        api::handlers::vendors::list_vendors,
        api::handlers::vendors::create_vendor,
        api::handlers::invoices::list_invoices,
        api::handlers::invoices::create_invoice,
        api::handlers::invoices::get_invoice,
        api::handlers::invoices::update_invoice,
        api::handlers::invoices::delete_invoice,
        api::handlers::invoices::send_invoice,
        api::handlers::invoices::mark_invoice_paid,
        api::handlers::bills::list_bills,
        api::handlers::bills::create_bill,
        api::handlers::bills::get_bill,
        api::handlers::bills::update_bill,
        api::handlers::bills::delete_bill,
        api::handlers::bills::approve_bill,
        api::handlers::bills::reject_bill,
        api::handlers::bills::mark_bill_paid,
        api::handlers::threads::list_threads,
        api::handlers::threads::create_thread,
        api::handlers::threads::get_thread,
        api::handlers::threads::list_messages,
        api::handlers::threads::create_message,
    ),
    components(
        schemas(
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::UserResponse,
            api::models::auth::CurrentUserResponse,
            api::models::clients::ClientCreate,
            api::models::clients::ClientUpdate,
            api::models::clients::ClientResponse,
            api::models::contacts::ContactCreate,
            api::models::contacts::ContactUpdate,
            api::models::contacts::ContactResponse,
            api::models::deals::DealStage,
            api::models::deals::DealCreate,
            api::models::deals::DealUpdate,
            api::models::deals::DealResponse,
            api::models::proposals::DocumentStatus,
            api::models::proposals::ProposalCreate,
            api::models::proposals::ProposalUpdate,
            api::models::proposals::ProposalResponse,
            api::models::contracts::ContractCreate,
            api::models::contracts::ContractUpdate,
            api::models::contracts::ContractResponse,
            api::models::engagements::EngagementStatus,
            api::models::engagements::EngagementCreate,
            api::models::engagements::EngagementUpdate,
            api::models::engagements::EngagementResponse,
            api::models::projects::ProjectStatus,
            api::models::projects::ProjectCreate,
            api::models::projects::ProjectUpdate,
            api::models::projects::ProjectResponse,
            api::models::vendors::VendorCreate,
            api::models::vendors::VendorResponse,
            api::models::invoices::InvoiceStatus,
            api::models::invoices::InvoiceCreate,
            api::models::invoices::InvoiceUpdate,
            api::models::invoices::InvoiceResponse,
            api::models::bills::BillStatus,
            api::models::bills::BillCreate,
            api::models::bills::BillUpdate,
            api::models::bills::BillResponse,
            api::models::threads::ThreadCreate,
            api::models::threads::ThreadResponse,
            api::models::threads::MessageCreate,
            api::models::threads::MessageResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, and session management. Sessions are carried in an HttpOnly cookie."),
        (name = "clients", description = "Client companies the practice works with."),
        (name = "contacts", description = "People at client companies."),
        (name = "deals", description = "Sales pipeline entries, tracked by stage."),
        (name = "proposals", description = "Proposal documents with a draft/sent/signed lifecycle."),
        (name = "contracts", description = "Contract documents with a draft/sent/signed lifecycle."),
        (name = "engagements", description = "Ongoing bodies of work for a client."),
        (name = "projects", description = "Individual projects under an engagement."),
        (name = "vendors", description = "Suppliers that issue bills to the practice."),
        (name = "invoices", description = "Outgoing invoices with a draft/sent/paid lifecycle."),
        (name = "bills", description = "Incoming bills with a pending/approved/rejected/paid lifecycle."),
        (name = "threads", description = "Message threads and their messages."),
    ),
    info(
        title = "Praxis API",
        version = "0.4.0",
        description = "REST API for a multi-tenant practice management backend.

All data is scoped to the authenticated user's organization. Requests for
records that belong to another organization return `404 Not Found` and
listings simply omit them; the API never discloses that a record exists
elsewhere.",
    ),
)]
pub struct ApiDoc;
