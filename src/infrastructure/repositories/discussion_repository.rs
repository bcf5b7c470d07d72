//! SeaORM implementation of DiscussionRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{
    Discussion, DiscussionReply, DiscussionRepository, DomainError, PageRequest, Paginated,
};
use crate::models::discussion::{self, Entity as DiscussionEntity};
use crate::models::discussion_reply::{self, Entity as ReplyEntity};
use crate::models::user::{self, Entity as UserEntity};

/// SeaORM-based implementation of DiscussionRepository
pub struct SeaOrmDiscussionRepository {
    db: DatabaseConnection,
}

impl SeaOrmDiscussionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn usernames<C: ConnectionTrait>(
    conn: &C,
    user_ids: Vec<i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(UserEntity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect())
}

fn to_reply(model: discussion_reply::Model, names: &HashMap<i32, String>) -> DiscussionReply {
    DiscussionReply {
        username: names.get(&model.user_id).cloned(),
        id: model.id,
        discussion_id: model.discussion_id,
        user_id: model.user_id,
        content: model.content,
        is_seller: model.is_seller,
        created_at: model.created_at,
    }
}

/// Attach live replies (oldest first) and author names to a batch of threads
async fn assemble<C: ConnectionTrait>(
    conn: &C,
    threads: Vec<discussion::Model>,
) -> Result<Vec<Discussion>, DbErr> {
    if threads.is_empty() {
        return Ok(Vec::new());
    }

    let thread_ids: Vec<i32> = threads.iter().map(|d| d.id).collect();
    let replies = ReplyEntity::find()
        .filter(discussion_reply::Column::DiscussionId.is_in(thread_ids))
        .filter(discussion_reply::Column::DeletedAt.is_null())
        .order_by_asc(discussion_reply::Column::CreatedAt)
        .order_by_asc(discussion_reply::Column::Id)
        .all(conn)
        .await?;

    let mut user_ids: Vec<i32> = threads.iter().map(|d| d.user_id).collect();
    user_ids.extend(replies.iter().map(|r| r.user_id));
    user_ids.sort_unstable();
    user_ids.dedup();
    let names = usernames(conn, user_ids).await?;

    let mut replies_by_thread: HashMap<i32, Vec<DiscussionReply>> = HashMap::new();
    for reply in replies {
        replies_by_thread
            .entry(reply.discussion_id)
            .or_default()
            .push(to_reply(reply, &names));
    }

    Ok(threads
        .into_iter()
        .map(|d| Discussion {
            username: names.get(&d.user_id).cloned(),
            replies: replies_by_thread.remove(&d.id).unwrap_or_default(),
            id: d.id,
            product_id: d.product_id,
            user_id: d.user_id,
            content: d.content,
            created_at: d.created_at,
        })
        .collect())
}

#[async_trait]
impl DiscussionRepository for SeaOrmDiscussionRepository {
    async fn find_page_by_product(
        &self,
        product_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Discussion>, DomainError> {
        let paginator = DiscussionEntity::find()
            .filter(discussion::Column::ProductId.eq(product_id))
            .filter(discussion::Column::DeletedAt.is_null())
            .order_by_desc(discussion::Column::CreatedAt)
            .order_by_desc(discussion::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let threads = paginator.fetch_page(page.page() - 1).await?;
        let items = assemble(&self.db, threads).await?;

        Ok(Paginated::new(items, total, &page))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Discussion>, DomainError> {
        let thread = DiscussionEntity::find_by_id(id)
            .filter(discussion::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        match thread {
            Some(model) => Ok(assemble(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        product_id: i32,
        user_id: i32,
        content: String,
    ) -> Result<Discussion, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let model = discussion::ActiveModel {
            product_id: Set(product_id),
            user_id: Set(user_id),
            content: Set(content),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        assemble(&self.db, vec![model])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal("discussion vanished after insert".to_string()))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let existing = DiscussionEntity::find_by_id(id)
            .filter(discussion::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: discussion::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn find_reply(&self, id: i32) -> Result<Option<DiscussionReply>, DomainError> {
        let Some(model) = ReplyEntity::find_by_id(id)
            .filter(discussion_reply::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let names = usernames(&self.db, vec![model.user_id]).await?;
        Ok(Some(to_reply(model, &names)))
    }

    async fn create_reply(
        &self,
        discussion_id: i32,
        user_id: i32,
        content: String,
        is_seller: bool,
    ) -> Result<DiscussionReply, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let model = discussion_reply::ActiveModel {
            discussion_id: Set(discussion_id),
            user_id: Set(user_id),
            content: Set(content),
            is_seller: Set(is_seller),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        let names = usernames(&self.db, vec![user_id]).await?;
        Ok(to_reply(model, &names))
    }

    async fn delete_reply(&self, id: i32) -> Result<(), DomainError> {
        let existing = ReplyEntity::find_by_id(id)
            .filter(discussion_reply::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: discussion_reply::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }
}
