use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use velaro_catalog::{Station, StationFilter};
use velaro_core::repository::StationRepository;
use velaro_shared::pagination::Page;

pub struct PgStationRepository {
    pool: PgPool,
}

impl PgStationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
pub(crate) struct StationRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country_code: String,
    pub timezone: String,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station {
            id: row.id,
            name: row.name,
            address: row.address,
            country_code: row.country_code.trim_end().to_string(),
            timezone: row.timezone,
        }
    }
}

#[async_trait]
impl StationRepository for PgStationRepository {
    async fn list_stations(
        &self,
        filter: &StationFilter,
        page: &Page,
    ) -> Result<(Vec<Station>, i64), Box<dyn std::error::Error + Send + Sync>> {
        let mut conditions = Vec::new();
        let mut idx = 0;

        if filter.country.is_some() {
            idx += 1;
            conditions.push(format!("country_code = ${}", idx));
        }
        if filter.search.is_some() {
            idx += 1;
            conditions.push(format!("(name ILIKE ${0} OR address ILIKE ${0})", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let list_sql = format!(
            "SELECT id, name, address, country_code, timezone FROM stations{} ORDER BY name ASC LIMIT ${} OFFSET ${}",
            where_clause,
            idx + 1,
            idx + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM stations{}", where_clause);

        let mut list_query = sqlx::query_as::<_, StationRow>(&list_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);

        if let Some(country) = &filter.country {
            list_query = list_query.bind(country);
            count_query = count_query.bind(country);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            list_query = list_query.bind(pattern.clone());
            count_query = count_query.bind(pattern);
        }

        let rows = list_query
            .bind(page.limit as i64)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let total = count_query.fetch_one(&self.pool).await?;

        Ok((rows.into_iter().map(Station::from).collect(), total))
    }
}
