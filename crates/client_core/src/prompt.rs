use async_trait::async_trait;
use chess_shared::domain::PromotionPiece;

/// Modal questions the controller suspends on while issuing a request.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// `None` abandons the pending move; nothing is sent.
    async fn choose_promotion(&self) -> Option<PromotionPiece>;
    async fn confirm(&self, question: &str) -> bool;
}

/// Answers every prompt without asking: queen on promotion, yes on confirmation.
pub struct AutoPrompter;

#[async_trait]
impl Prompter for AutoPrompter {
    async fn choose_promotion(&self) -> Option<PromotionPiece> {
        Some(PromotionPiece::Queen)
    }

    async fn confirm(&self, _question: &str) -> bool {
        true
    }
}
