//! Generic SeaORM plumbing shared by the domain `Pg*Repository` types.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, TryInsert, TryInsertResult,
};
use std::marker::PhantomData;

/// Thin wrapper around a pool for one entity.
///
/// Domain repositories keep their query-specific code and delegate the
/// common insert, lookup and upsert shapes here.
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_id<K>(&self, id: K) -> Result<Option<E::Model>, DbErr>
    where
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        E::find_by_id(id).one(&self.db).await
    }

    /// `INSERT .. ON CONFLICT (conflict) DO NOTHING`.
    ///
    /// Returns `true` when a row was written, `false` when the conflict
    /// target already existed.
    pub async fn insert_if_absent<C>(&self, model: E::ActiveModel, conflict: C) -> Result<bool, DbErr>
    where
        C: IntoIterator<Item = E::Column>,
    {
        let result = Self::insert_if_absent_query(model, conflict)
            .exec(&self.db)
            .await?;

        Ok(matches!(result, TryInsertResult::Inserted(_)))
    }

    fn insert_if_absent_query<C>(model: E::ActiveModel, conflict: C) -> TryInsert<E::ActiveModel>
    where
        C: IntoIterator<Item = E::Column>,
    {
        E::insert(model).on_conflict_do_nothing_on(conflict)
    }

    /// `INSERT .. ON CONFLICT (conflict) DO UPDATE SET update = excluded.update RETURNING *`.
    ///
    /// The database serializes concurrent upserts on the same conflict target.
    pub async fn upsert<C, U>(
        &self,
        model: E::ActiveModel,
        conflict: C,
        update: U,
    ) -> Result<E::Model, DbErr>
    where
        C: IntoIterator<Item = E::Column>,
        U: IntoIterator<Item = E::Column>,
    {
        E::insert(model)
            .on_conflict(OnConflict::columns(conflict).update_columns(update).to_owned())
            .exec_with_returning(&self.db)
            .await
    }
}
