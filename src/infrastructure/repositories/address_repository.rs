//! SeaORM implementation of AddressRepository
//!
//! Each write runs inside one transaction. The row being written is saved
//! first and the flag is then cleared on every other live address of the
//! user, so a committed state never holds two defaults or two pickups.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{Address, AddressChanges, AddressRepository, DomainError, NewAddress};
use crate::models::city::Entity as CityEntity;
use crate::models::district::Entity as DistrictEntity;
use crate::models::province::Entity as ProvinceEntity;
use crate::models::subdistrict::Entity as SubdistrictEntity;
use crate::models::user_address::{ActiveModel, Column, Entity as AddressEntity, Model};
use crate::models::{city, district, province, subdistrict};

/// SeaORM-based implementation of AddressRepository
pub struct SeaOrmAddressRepository {
    db: DatabaseConnection,
}

impl SeaOrmAddressRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn live_for_user(user_id: i32) -> Condition {
    Condition::all()
        .add(Column::UserId.eq(user_id))
        .add(Column::DeletedAt.is_null())
}

/// Lower `flag` on every live address of the user except `keep_id`
async fn clear_flag<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    flag: Column,
    keep_id: i32,
    now: &str,
) -> Result<u64, DbErr> {
    let result = AddressEntity::update_many()
        .col_expr(flag, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(now.to_owned()))
        .filter(live_for_user(user_id))
        .filter(Column::Id.ne(keep_id))
        .filter(flag.eq(true))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

async fn find_live<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    id: i32,
) -> Result<Option<Model>, DbErr> {
    AddressEntity::find_by_id(id)
        .filter(live_for_user(user_id))
        .one(conn)
        .await
}

/// Attach province / city / district / subdistrict names in four batched lookups
async fn with_location_names<C: ConnectionTrait>(
    conn: &C,
    models: Vec<Model>,
) -> Result<Vec<Address>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let province_ids: Vec<i32> = models.iter().map(|m| m.province_id).collect();
    let city_ids: Vec<i32> = models.iter().map(|m| m.city_id).collect();
    let district_ids: Vec<i32> = models.iter().map(|m| m.district_id).collect();
    let subdistrict_ids: Vec<i32> = models.iter().map(|m| m.subdistrict_id).collect();

    let provinces: HashMap<i32, String> = ProvinceEntity::find()
        .filter(province::Column::Id.is_in(province_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let cities: HashMap<i32, String> = CityEntity::find()
        .filter(city::Column::Id.is_in(city_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let districts: HashMap<i32, String> = DistrictEntity::find()
        .filter(district::Column::Id.is_in(district_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();
    let subdistricts: HashMap<i32, String> = SubdistrictEntity::find()
        .filter(subdistrict::Column::Id.is_in(subdistrict_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    Ok(models
        .into_iter()
        .map(|m| Address {
            id: m.id,
            user_id: m.user_id,
            label: m.label,
            recipient_name: m.recipient_name,
            phone: m.phone,
            province_id: m.province_id,
            province_name: provinces.get(&m.province_id).cloned(),
            city_id: m.city_id,
            city_name: cities.get(&m.city_id).cloned(),
            district_id: m.district_id,
            district_name: districts.get(&m.district_id).cloned(),
            subdistrict_id: m.subdistrict_id,
            subdistrict_name: subdistricts.get(&m.subdistrict_id).cloned(),
            postal_code: m.postal_code,
            detail: m.detail,
            is_default: m.is_default,
            is_pickup: m.is_pickup,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
        .collect())
}

async fn single<C: ConnectionTrait>(conn: &C, model: Model) -> Result<Address, DomainError> {
    with_location_names(conn, vec![model])
        .await?
        .pop()
        .ok_or_else(|| DomainError::Internal("address vanished while loading".to_string()))
}

#[async_trait]
impl AddressRepository for SeaOrmAddressRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Address>, DomainError> {
        let models = AddressEntity::find()
            .filter(live_for_user(user_id))
            .order_by_desc(Column::IsDefault)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(with_location_names(&self.db, models).await?)
    }

    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Address>, DomainError> {
        match find_live(&self.db, user_id, id).await? {
            Some(model) => Ok(Some(single(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user_id: i32, input: NewAddress) -> Result<Address, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let existing = AddressEntity::find()
            .filter(live_for_user(user_id))
            .count(&txn)
            .await?;
        let first = existing == 0;
        let is_default = first || input.is_default;
        let is_pickup = first || input.is_pickup;

        let new_address = ActiveModel {
            user_id: Set(user_id),
            label: Set(input.label),
            recipient_name: Set(input.recipient_name),
            phone: Set(input.phone),
            province_id: Set(input.province_id),
            city_id: Set(input.city_id),
            district_id: Set(input.district_id),
            subdistrict_id: Set(input.subdistrict_id),
            postal_code: Set(input.postal_code),
            detail: Set(input.detail),
            is_default: Set(is_default),
            is_pickup: Set(is_pickup),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            deleted_at: Set(None),
            ..Default::default()
        };
        let model = new_address.insert(&txn).await?;

        if !first && is_default {
            clear_flag(&txn, user_id, Column::IsDefault, model.id, &now).await?;
        }
        if !first && is_pickup {
            clear_flag(&txn, user_id, Column::IsPickup, model.id, &now).await?;
        }

        let address = single(&txn, model).await?;
        txn.commit().await?;

        tracing::info!(
            "Created address {} for user {} (default={}, pickup={})",
            address.id,
            user_id,
            address.is_default,
            address.is_pickup
        );
        Ok(address)
    }

    async fn update(
        &self,
        user_id: i32,
        id: i32,
        changes: AddressChanges,
    ) -> Result<Address, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let existing = find_live(&txn, user_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(label) = changes.label {
            active.label = Set(label);
        }
        if let Some(recipient_name) = changes.recipient_name {
            active.recipient_name = Set(recipient_name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(province_id) = changes.province_id {
            active.province_id = Set(province_id);
        }
        if let Some(city_id) = changes.city_id {
            active.city_id = Set(city_id);
        }
        if let Some(district_id) = changes.district_id {
            active.district_id = Set(district_id);
        }
        if let Some(subdistrict_id) = changes.subdistrict_id {
            active.subdistrict_id = Set(subdistrict_id);
        }
        if let Some(postal_code) = changes.postal_code {
            active.postal_code = Set(postal_code);
        }
        if let Some(detail) = changes.detail {
            active.detail = Set(detail);
        }
        if changes.make_default {
            active.is_default = Set(true);
        }
        if changes.make_pickup {
            active.is_pickup = Set(true);
        }
        active.updated_at = Set(now.clone());

        let model = active.update(&txn).await?;

        if changes.make_default {
            clear_flag(&txn, user_id, Column::IsDefault, id, &now).await?;
        }
        if changes.make_pickup {
            clear_flag(&txn, user_id, Column::IsPickup, id, &now).await?;
        }

        let address = single(&txn, model).await?;
        txn.commit().await?;
        Ok(address)
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<(), DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let existing = find_live(&txn, user_id, id)
            .await?
            .ok_or(DomainError::NotFound)?;
        let (was_default, was_pickup) = (existing.is_default, existing.is_pickup);

        let mut active: ActiveModel = existing.into();
        active.is_default = Set(false);
        active.is_pickup = Set(false);
        active.deleted_at = Set(Some(now.clone()));
        active.updated_at = Set(now.clone());
        active.update(&txn).await?;

        if was_default || was_pickup {
            let heir = AddressEntity::find()
                .filter(live_for_user(user_id))
                .order_by_asc(Column::Id)
                .one(&txn)
                .await?;

            if let Some(heir) = heir {
                tracing::info!(
                    "Address {} inherits flags from deleted address {} (default={}, pickup={})",
                    heir.id,
                    id,
                    was_default,
                    was_pickup
                );
                let mut heir: ActiveModel = heir.into();
                if was_default {
                    heir.is_default = Set(true);
                }
                if was_pickup {
                    heir.is_pickup = Set(true);
                }
                heir.updated_at = Set(now);
                heir.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }
}
