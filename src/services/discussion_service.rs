//! Discussion Service - buyer questions and seller answers on product pages

use serde::Deserialize;

use crate::domain::validation::validate_text;
use crate::domain::{
    Discussion, DiscussionReply, DomainError, PageRequest, Paginated, Product, Validate,
};
use crate::infrastructure::AppState;
use crate::models::product::STATUS_ACTIVE;

const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionInput {
    pub content: String,
}

impl Validate for DiscussionInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_text("content", &self.content, 1, MAX_CONTENT_LEN)
    }
}

/// Drafts are invisible, so their threads are too
async fn find_listed_product(state: &AppState, product_id: i32) -> Result<Product, DomainError> {
    state
        .product_repo
        .find_by_id(product_id)
        .await?
        .filter(|p| p.status == STATUS_ACTIVE)
        .ok_or(DomainError::NotFound)
}

pub async fn list_discussions(
    state: &AppState,
    product_id: i32,
    page: PageRequest,
) -> Result<Paginated<Discussion>, DomainError> {
    find_listed_product(state, product_id).await?;

    state
        .discussion_repo
        .find_page_by_product(product_id, page)
        .await
}

pub async fn create_discussion(
    state: &AppState,
    user_id: i32,
    product_id: i32,
    input: DiscussionInput,
) -> Result<Discussion, DomainError> {
    input.validate()?;

    find_listed_product(state, product_id).await?;

    let discussion = state
        .discussion_repo
        .create(product_id, user_id, input.content.trim().to_string())
        .await?;
    tracing::info!(
        "User {} opened discussion {} on product {}",
        user_id,
        discussion.id,
        product_id
    );
    Ok(discussion)
}

/// Answer a thread. The reply is flagged as the seller's when the author
/// owns the shop selling the product.
pub async fn reply(
    state: &AppState,
    user_id: i32,
    discussion_id: i32,
    input: DiscussionInput,
) -> Result<DiscussionReply, DomainError> {
    input.validate()?;

    let discussion = state
        .discussion_repo
        .find_by_id(discussion_id)
        .await?
        .ok_or(DomainError::NotFound)?;
    let product = find_listed_product(state, discussion.product_id).await?;
    let is_seller = state
        .shop_repo
        .find_by_id(product.shop_id)
        .await?
        .is_some_and(|shop| shop.user_id == user_id);

    state
        .discussion_repo
        .create_reply(
            discussion_id,
            user_id,
            input.content.trim().to_string(),
            is_seller,
        )
        .await
}

pub async fn delete_discussion(state: &AppState, user_id: i32, id: i32) -> Result<(), DomainError> {
    let discussion = state
        .discussion_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;
    if discussion.user_id != user_id {
        return Err(DomainError::Forbidden);
    }
    state.discussion_repo.delete(id).await
}

pub async fn delete_reply(state: &AppState, user_id: i32, id: i32) -> Result<(), DomainError> {
    let reply = state
        .discussion_repo
        .find_reply(id)
        .await?
        .ok_or(DomainError::NotFound)?;
    if reply.user_id != user_id {
        return Err(DomainError::Forbidden);
    }
    state.discussion_repo.delete_reply(id).await
}
