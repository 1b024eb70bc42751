use chapterhouse_core::error::{CoreError, CoreResult};
use chapterhouse_core::scope::Scope;
use chapterhouse_db::models::pitch::Pitch;
use chapterhouse_db::store::DirectoryStore;

pub struct PitchService;

impl PitchService {
    /// Pitches in the caller's chapter; every pitch for super admins.
    pub async fn list(store: &dyn DirectoryStore, caller: &Scope) -> CoreResult<Vec<Pitch>> {
        Ok(store.list_pitches(caller.chapter_filter()).await?)
    }

    /// Set or clear the winner flag of a pitch.
    pub async fn assign_winner(
        store: &dyn DirectoryStore,
        caller: &Scope,
        pitch_id: &str,
        is_winner: bool,
    ) -> CoreResult<Pitch> {
        caller.require_admin()?;
        let pitch = store
            .find_pitch(pitch_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Pitch", pitch_id))?;
        caller.authorize_winner(&pitch.chapter)?;

        let updated = store
            .set_pitch_winner(&pitch.id, is_winner)
            .await?
            .ok_or_else(|| CoreError::not_found("Pitch", pitch_id))?;

        tracing::info!(
            pitch_id = %updated.id,
            chapter = %updated.chapter,
            is_winner,
            by = %caller.account_id,
            "Winner flag updated",
        );
        Ok(updated)
    }
}
