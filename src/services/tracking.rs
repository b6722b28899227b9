use crate::{
    error::{AppError, AppResult},
    models::{tracking, HabitModel, Tracking, TrackingModel},
    services::habit::HabitService,
    services::stats::{self, HabitStats},
    utils::time,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

pub struct TrackingService {
    db: DatabaseConnection,
}

impl TrackingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append a done/missed event for today.
    ///
    /// Duplicate protection is a read-then-write range query over the
    /// current calendar day; two racing requests can still both pass the
    /// check, which is accepted. Returns the habit, the new event, and the
    /// full newest-first history including it.
    pub async fn track(
        &self,
        user_id: i32,
        habit_id: i32,
        status: String,
        note: Option<String>,
        utc_offset_minutes: i32,
    ) -> AppResult<(HabitModel, TrackingModel, Vec<TrackingModel>)> {
        let habits = HabitService::new(self.db.clone());
        let habit = habits.get_owned(user_id, habit_id).await?;

        let now = time::local_now(utc_offset_minutes);
        let (start_of_day, end_of_day) = time::day_bounds(now);

        let existing = Tracking::find()
            .filter(tracking::Column::HabitId.eq(habit_id))
            .filter(tracking::Column::UserId.eq(user_id))
            .filter(tracking::Column::TrackedAt.between(start_of_day, end_of_day))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "You have already tracked this habit today".to_string(),
            ));
        }

        let created = chrono::Utc::now().naive_utc();
        let event = tracking::ActiveModel {
            habit_id: ActiveValue::Set(habit_id),
            user_id: ActiveValue::Set(user_id),
            status: ActiveValue::Set(status),
            note: ActiveValue::Set(note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())),
            tracked_at: ActiveValue::Set(now),
            created_at: ActiveValue::Set(created),
            updated_at: ActiveValue::Set(created),
            ..Default::default()
        };
        let event = event.insert(&self.db).await?;

        let history = habits.full_history(habit_id).await?;

        Ok((habit, event, history))
    }

    /// Owner-scoped paginated history, newest first, with statistics over
    /// the whole ledger. `total` counts every entry, not the page. The
    /// full history is loaded for the stats anyway, so the page is sliced
    /// from it rather than queried separately.
    pub async fn list(
        &self,
        user_id: i32,
        habit_id: i32,
        page: u64,
        limit: u64,
    ) -> AppResult<(HabitModel, Vec<TrackingModel>, u64, HabitStats)> {
        let habits = HabitService::new(self.db.clone());
        let habit = habits.get_owned(user_id, habit_id).await?;

        let history = habits.full_history(habit_id).await?;
        let habit_stats = stats::stats_for(&history);
        let total = history.len() as u64;

        let limit = limit.max(1);
        let start = page.saturating_sub(1).saturating_mul(limit) as usize;
        let items: Vec<TrackingModel> = history
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        Ok((habit, items, total, habit_stats))
    }

    /// Owner-scoped update; status and note only.
    pub async fn update(
        &self,
        user_id: i32,
        tracking_id: i32,
        status: String,
        note: Option<String>,
    ) -> AppResult<TrackingModel> {
        let event = self.get_owned(user_id, tracking_id).await?;

        let mut active: tracking::ActiveModel = event.into();
        active.status = ActiveValue::Set(status);
        active.note =
            ActiveValue::Set(note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()));
        active.updated_at = ActiveValue::Set(chrono::Utc::now().naive_utc());

        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, user_id: i32, tracking_id: i32) -> AppResult<()> {
        let event = self.get_owned(user_id, tracking_id).await?;
        Tracking::delete_by_id(event.id).exec(&self.db).await?;
        Ok(())
    }

    async fn get_owned(&self, user_id: i32, tracking_id: i32) -> AppResult<TrackingModel> {
        Tracking::find_by_id(tracking_id)
            .filter(tracking::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}
