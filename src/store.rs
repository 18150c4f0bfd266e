use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set, SqlErr, TransactionTrait,
    sea_query::{Expr, NullOrdering, Order},
};
use thiserror::Error;
use tracing::debug;

use crate::{entities::movie, models::MovieDetails, ranking};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no movie with id {0}")]
    NotFound(i32),

    #[error("\"{0}\" is already in your list")]
    DuplicateTitle(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every movie, lowest rating first. Unrated movies sort before rated ones.
    pub async fn list_all(&self) -> Result<Vec<movie::Model>> {
        Ok(by_rating().all(&self.db).await?)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(StoreError::NotFound(id))
    }

    pub async fn insert(&self, details: MovieDetails) -> Result<movie::Model> {
        let existing = movie::Entity::find()
            .filter(movie::Column::Title.eq(details.title.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(StoreError::DuplicateTitle(details.title));
        }

        let title = details.title.clone();
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(details.title),
            year: Set(details.year),
            description: Set(details.description),
            rating: Set(None),
            ranking: Set(None),
            img_url: Set(details.poster_url),
        };

        match model.insert(&self.db).await {
            Ok(movie) => {
                debug!(movie_id = movie.id, title = %movie.title, "inserted movie");
                Ok(movie)
            },
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(StoreError::DuplicateTitle(title))
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Sets the rating and re-ranks every movie in the same transaction.
    pub async fn update_rating(&self, id: i32, rating: f64) -> Result<movie::Model> {
        let txn = self.db.begin().await?;

        let movie =
            movie::Entity::find_by_id(id).one(&txn).await?.ok_or(StoreError::NotFound(id))?;
        let mut active: movie::ActiveModel = movie.into();
        active.rating = Set(Some(rating));
        active.update(&txn).await?;

        rerank(&txn).await?;
        txn.commit().await?;

        debug!(movie_id = id, rating = rating, "updated rating");
        self.get_by_id(id).await
    }

    /// Removes a movie, re-ranks the rest, and returns the record that was
    /// deleted.
    pub async fn delete(&self, id: i32) -> Result<movie::Model> {
        let txn = self.db.begin().await?;

        let movie =
            movie::Entity::find_by_id(id).one(&txn).await?.ok_or(StoreError::NotFound(id))?;
        let res = movie::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        rerank(&txn).await?;
        txn.commit().await?;

        debug!(movie_id = id, title = %movie.title, "deleted movie");
        Ok(movie)
    }

    pub async fn persist_rankings(&self, rankings: &[(i32, i32)]) -> Result<()> {
        let txn = self.db.begin().await?;
        write_rankings(&txn, rankings).await?;
        txn.commit().await?;
        Ok(())
    }
}

fn by_rating() -> Select<movie::Entity> {
    movie::Entity::find()
        .order_by_with_nulls(movie::Column::Rating, Order::Asc, NullOrdering::First)
        .order_by_asc(movie::Column::Id)
}

async fn rerank<C: ConnectionTrait>(conn: &C) -> Result<()> {
    let movies = by_rating().all(conn).await?;
    write_rankings(conn, &ranking::compute_rankings(&movies)).await
}

async fn write_rankings<C: ConnectionTrait>(conn: &C, rankings: &[(i32, i32)]) -> Result<()> {
    for &(id, ranking) in rankings {
        movie::Entity::update_many()
            .col_expr(movie::Column::Ranking, Expr::value(ranking))
            .filter(movie::Column::Id.eq(id))
            .exec(conn)
            .await?;
    }
    Ok(())
}
