use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxAssetRepo {
    pub pool: PgPool,
}
