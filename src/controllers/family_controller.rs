// src/controllers/family_controller.rs
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Result, delete, get, post, put, route, web};

use crate::{
    db::MemberStore,
    errors::ApiError,
    models::member::{FamilyResponse, MemberUpdate, MessageResponse, NewMember},
    relationship,
    render::TreeRenderer,
    tree,
};

#[get("/family")]
pub async fn get_family(store: web::Data<dyn MemberStore>) -> Result<HttpResponse, ApiError> {
    let family = store.load().await?;
    Ok(HttpResponse::Ok().json(FamilyResponse { family }))
}

#[post("/family")]
pub async fn add_family_member(
    store: web::Data<dyn MemberStore>,
    payload: web::Json<NewMember>,
) -> Result<HttpResponse, ApiError> {
    // validasi field wajib sebelum menyentuh store
    let member = payload.into_inner().into_member()?;

    let mut family = store.load().await?;
    log::info!("menambah anggota {} ({})", member.id, member.name);
    family.push(member);
    store.save(&family).await?;

    Ok(HttpResponse::Created().json(MessageResponse::new("Member added successfully")))
}

#[get("/family/relationship/{id}")]
pub async fn describe_relationship(
    store: web::Data<dyn MemberStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let member_id = path.into_inner();
    let family = store.load().await?;

    Ok(HttpResponse::Ok().json(relationship::describe(&family, member_id)))
}

#[get("/family/tree")]
pub async fn family_tree(
    store: web::Data<dyn MemberStore>,
    renderer: web::Data<dyn TreeRenderer>,
) -> Result<HttpResponse, ApiError> {
    let family = store.load().await?;
    let graph = tree::build_graph(&family);

    let png = renderer.render_png(&graph).await.map_err(|e| {
        log::error!("Error generating family tree: {}", e);
        e
    })?;

    let cd = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename("family_tree.png".to_string())],
    };
    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header(cd)
        .body(png))
}

#[put("/family/{id}")]
pub async fn update_family_member(
    store: web::Data<dyn MemberStore>,
    path: web::Path<i64>,
    payload: web::Json<MemberUpdate>,
) -> Result<HttpResponse, ApiError> {
    let member_id = path.into_inner();
    let mut family = store.load().await?;

    let member = family
        .iter_mut()
        .find(|m| m.id == member_id)
        .ok_or(ApiError::NotFound(member_id))?;
    member.apply(payload.into_inner());

    store.save(&family).await?;
    log::info!("anggota {} diperbarui", member_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Member updated successfully")))
}

#[delete("/family/{id}")]
pub async fn delete_family_member(
    store: web::Data<dyn MemberStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let member_id = path.into_inner();
    let mut family = store.load().await?;

    let before = family.len();
    family.retain(|m| m.id != member_id);
    if family.len() == before {
        return Err(ApiError::NotFound(member_id));
    }

    store.save(&family).await?;
    log::info!("anggota {} dihapus", member_id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Member deleted successfully")))
}

#[route("/family", method = "OPTIONS")]
pub async fn family_options() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[route("/family/{id}", method = "OPTIONS")]
pub async fn family_member_options() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub fn scope() -> actix_web::Scope {
    web::scope("")
        .service(get_family)
        .service(add_family_member)
        .service(describe_relationship)
        .service(family_tree)
        .service(update_family_member)
        .service(delete_family_member)
        .service(family_options)
        .service(family_member_options)
}
