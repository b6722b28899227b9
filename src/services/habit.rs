use crate::{
    error::{AppError, AppResult},
    models::{habit, tracking, Habit, HabitModel, Tracking, TrackingModel},
    services::stats::{self, HabitStats},
    utils::time,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Validated habit attributes shared by create and update.
#[derive(Debug, Clone)]
pub struct HabitInput {
    pub title: String,
    pub habit_type: String,
    pub target: i32,
    pub frequency: String,
    pub reminder_time: Option<String>,
    pub duration_days: Option<i32>,
}

/// A habit annotated with its derived statistics.
pub struct HabitWithStats {
    pub habit: HabitModel,
    pub stats: HabitStats,
    /// Tracking entries within the trailing 7 days.
    pub recent_tracking: u64,
}

pub struct HabitService {
    db: DatabaseConnection,
}

impl HabitService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: i32, input: HabitInput) -> AppResult<HabitModel> {
        let title = input.title.trim().to_string();

        if self.title_exists(user_id, &title, None).await? {
            return Err(AppError::Conflict(
                "A habit with this title already exists".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let new_habit = habit::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            title: ActiveValue::Set(title),
            habit_type: ActiveValue::Set(input.habit_type),
            target: ActiveValue::Set(input.target),
            frequency: ActiveValue::Set(input.frequency),
            reminder_time: ActiveValue::Set(input.reminder_time),
            duration_days: ActiveValue::Set(input.duration_days),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(new_habit.insert(&self.db).await?)
    }

    /// All habits of the user, newest first, each with statistics over its
    /// full tracking history plus the trailing-7-day entry count.
    pub async fn list_with_stats(
        &self,
        user_id: i32,
        utc_offset_minutes: i32,
    ) -> AppResult<Vec<HabitWithStats>> {
        let habits = Habit::find()
            .filter(habit::Column::UserId.eq(user_id))
            .order_by_desc(habit::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let cutoff = time::days_ago(time::local_now(utc_offset_minutes), 7);

        let mut result = Vec::with_capacity(habits.len());
        for habit in habits {
            let history = self.full_history(habit.id).await?;
            let stats = stats::stats_for(&history);
            let recent_tracking = stats::count_since(&history, cutoff);
            result.push(HabitWithStats {
                habit,
                stats,
                recent_tracking,
            });
        }

        Ok(result)
    }

    /// Owner-scoped fetch with the most recent 30 tracking entries.
    pub async fn get_with_history(
        &self,
        user_id: i32,
        habit_id: i32,
    ) -> AppResult<(HabitModel, Vec<TrackingModel>)> {
        let habit = self.get_owned(user_id, habit_id).await?;

        let history = Tracking::find()
            .filter(tracking::Column::HabitId.eq(habit_id))
            .order_by_desc(tracking::Column::TrackedAt)
            .limit(30)
            .all(&self.db)
            .await?;

        Ok((habit, history))
    }

    pub async fn update(
        &self,
        user_id: i32,
        habit_id: i32,
        input: HabitInput,
    ) -> AppResult<HabitModel> {
        let habit = self.get_owned(user_id, habit_id).await?;
        let title = input.title.trim().to_string();

        if self.title_exists(user_id, &title, Some(habit_id)).await? {
            return Err(AppError::Conflict(
                "A habit with this title already exists".to_string(),
            ));
        }

        let mut active: habit::ActiveModel = habit.into();
        active.title = ActiveValue::Set(title);
        active.habit_type = ActiveValue::Set(input.habit_type);
        active.target = ActiveValue::Set(input.target);
        active.frequency = ActiveValue::Set(input.frequency);
        active.reminder_time = ActiveValue::Set(input.reminder_time);
        active.duration_days = ActiveValue::Set(input.duration_days);
        active.updated_at = ActiveValue::Set(chrono::Utc::now().naive_utc());

        Ok(active.update(&self.db).await?)
    }

    /// Delete a habit and all of its tracking rows. The FK cascade would
    /// cover the rows too; the explicit delete keeps the invariant visible
    /// and exact.
    pub async fn delete(&self, user_id: i32, habit_id: i32) -> AppResult<()> {
        let habit = self.get_owned(user_id, habit_id).await?;

        Tracking::delete_many()
            .filter(tracking::Column::HabitId.eq(habit.id))
            .exec(&self.db)
            .await?;

        Habit::delete_by_id(habit.id).exec(&self.db).await?;
        Ok(())
    }

    /// Owner-scoped lookup; a habit belonging to someone else is a 404,
    /// never a 403, so ids are not probeable.
    pub async fn get_owned(&self, user_id: i32, habit_id: i32) -> AppResult<HabitModel> {
        Habit::find_by_id(habit_id)
            .filter(habit::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Full tracking history for a habit, newest first.
    pub async fn full_history(&self, habit_id: i32) -> AppResult<Vec<TrackingModel>> {
        let history = Tracking::find()
            .filter(tracking::Column::HabitId.eq(habit_id))
            .order_by_desc(tracking::Column::TrackedAt)
            .all(&self.db)
            .await?;
        Ok(history)
    }

    async fn title_exists(
        &self,
        user_id: i32,
        title: &str,
        exclude_id: Option<i32>,
    ) -> AppResult<bool> {
        let mut query = Habit::find()
            .filter(habit::Column::UserId.eq(user_id))
            .filter(habit::Column::Title.eq(title));
        if let Some(id) = exclude_id {
            query = query.filter(habit::Column::Id.ne(id));
        }
        Ok(query.one(&self.db).await?.is_some())
    }
}
