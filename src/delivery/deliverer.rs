use std::sync::Arc;

use log::debug;
use log::info;

use super::DeliveryError;
use super::DeliveryOutcome;
use super::Messenger;
use super::SendError;
use crate::database::model::SubscriberModel;
use crate::provider::Posting;

/// Resolves a subscriber's destination and sends one batch of postings.
pub struct Deliverer {
    messenger: Arc<dyn Messenger>,
}

impl Deliverer {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    pub async fn deliver(
        &self,
        subscriber: &SubscriberModel,
        postings: &[Posting],
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let destination = subscriber.destination_ref.as_deref().unwrap_or("");
        // Destinations can go stale between sweeps; re-resolve every time.
        if destination.is_empty() || !self.messenger.resolve(destination).await {
            return Err(DeliveryError::UnresolvedDestination {
                destination: destination.to_string(),
            });
        }
        if !self.messenger.can_send(destination).await {
            return Err(DeliveryError::PermissionDenied {
                destination: destination.to_string(),
            });
        }

        if postings.is_empty() {
            debug!("No recent postings for user {}", subscriber.user_id);
            return Ok(DeliveryOutcome::NoContent);
        }

        let text = Self::format_message(&subscriber.user_id, postings);
        match self.messenger.send(destination, &text).await {
            Ok(()) => {
                info!(
                    "Delivered {} postings to user {}",
                    postings.len(),
                    subscriber.user_id
                );
                Ok(DeliveryOutcome::Delivered {
                    count: postings.len(),
                })
            }
            Err(SendError::Forbidden) => Err(DeliveryError::PermissionDenied {
                destination: destination.to_string(),
            }),
            Err(e) => Err(DeliveryError::TransportError {
                destination: destination.to_string(),
                source: e,
            }),
        }
    }

    /// One line per posting; links wrapped in `<>` to suppress link previews.
    fn format_message(user_id: &str, postings: &[Posting]) -> String {
        let mut text = format!("<@{user_id}> Top Recent Job Results:\n");
        for posting in postings {
            text.push_str(&format!(
                "• {} at {}: <{}>\n",
                posting.title, posting.employer, posting.apply_link
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_message_format() {
        let postings = vec![Posting {
            title: "Rust Engineer".to_string(),
            employer: "Acme".to_string(),
            apply_link: "https://jobs.example/1".to_string(),
            posted_at: Utc::now(),
        }];

        let text = Deliverer::format_message("42", &postings);
        assert!(text.starts_with("<@42> Top Recent Job Results:\n"));
        assert!(text.contains("• Rust Engineer at Acme: <https://jobs.example/1>"));
    }
}
