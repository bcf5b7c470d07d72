//! SeaORM implementation of LocationRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{City, District, DomainError, LocationRepository, Province, Subdistrict};
use crate::models::city::{self, Entity as CityEntity};
use crate::models::district::{self, Entity as DistrictEntity};
use crate::models::province::{self, Entity as ProvinceEntity};
use crate::models::subdistrict::{self, Entity as SubdistrictEntity};

/// SeaORM-based implementation of LocationRepository
pub struct SeaOrmLocationRepository {
    db: DatabaseConnection,
}

impl SeaOrmLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for SeaOrmLocationRepository {
    async fn find_provinces(&self) -> Result<Vec<Province>, DomainError> {
        let provinces = ProvinceEntity::find()
            .order_by_asc(province::Column::Name)
            .all(&self.db)
            .await?;
        Ok(provinces.into_iter().map(Province::from).collect())
    }

    async fn find_province(&self, id: i32) -> Result<Option<Province>, DomainError> {
        let province = ProvinceEntity::find_by_id(id).one(&self.db).await?;
        Ok(province.map(Province::from))
    }

    async fn find_cities_by_province(&self, province_id: i32) -> Result<Vec<City>, DomainError> {
        let cities = CityEntity::find()
            .filter(city::Column::ProvinceId.eq(province_id))
            .order_by_asc(city::Column::Name)
            .all(&self.db)
            .await?;
        Ok(cities.into_iter().map(City::from).collect())
    }

    async fn find_city(&self, id: i32) -> Result<Option<City>, DomainError> {
        let city = CityEntity::find_by_id(id).one(&self.db).await?;
        Ok(city.map(City::from))
    }

    async fn find_districts_by_city(&self, city_id: i32) -> Result<Vec<District>, DomainError> {
        let districts = DistrictEntity::find()
            .filter(district::Column::CityId.eq(city_id))
            .order_by_asc(district::Column::Name)
            .all(&self.db)
            .await?;
        Ok(districts.into_iter().map(District::from).collect())
    }

    async fn find_district(&self, id: i32) -> Result<Option<District>, DomainError> {
        let district = DistrictEntity::find_by_id(id).one(&self.db).await?;
        Ok(district.map(District::from))
    }

    async fn find_subdistricts_by_district(
        &self,
        district_id: i32,
    ) -> Result<Vec<Subdistrict>, DomainError> {
        let subdistricts = SubdistrictEntity::find()
            .filter(subdistrict::Column::DistrictId.eq(district_id))
            .order_by_asc(subdistrict::Column::Name)
            .all(&self.db)
            .await?;
        Ok(subdistricts.into_iter().map(Subdistrict::from).collect())
    }

    async fn find_subdistrict(&self, id: i32) -> Result<Option<Subdistrict>, DomainError> {
        let subdistrict = SubdistrictEntity::find_by_id(id).one(&self.db).await?;
        Ok(subdistrict.map(Subdistrict::from))
    }
}
