//! Campaign Manager - Handles campaign lifecycle and sequence editing

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use vibemail_common::types::CampaignStatus;
use vibemail_common::{Error, Result};
use vibemail_storage::models::{Campaign, CampaignStep, CreateCampaign};
use vibemail_storage::{Update, Workspace};

use crate::assistant::{Copywriter, EmailDraft};

/// Campaign Manager
#[derive(Clone)]
pub struct CampaignManager {
    workspace: Arc<Workspace>,
    copywriter: Copywriter,
}

impl CampaignManager {
    pub fn new(workspace: Arc<Workspace>, copywriter: Copywriter) -> Self {
        Self {
            workspace,
            copywriter,
        }
    }

    /// Campaigns in creation order, optionally filtered by status
    pub async fn list(&self, status: Option<CampaignStatus>) -> Vec<Campaign> {
        self.workspace
            .campaigns()
            .get_all()
            .await
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Campaign> {
        self.workspace
            .campaigns()
            .get_all()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Create a campaign; it starts as a draft unless steps are given
    pub async fn create(&self, input: CreateCampaign) -> Result<Campaign> {
        if input.total_leads == Some(0) {
            return Err(Error::Validation(
                "A campaign needs at least one lead".to_string(),
            ));
        }
        validate_steps(&input.steps)?;

        let campaign = Campaign::new(input, Utc::now());
        let campaign = self
            .workspace
            .campaigns()
            .update(|campaigns| {
                let mut next = campaigns.to_vec();
                next.push(campaign.clone());
                Ok(Update::Replace(next, campaign))
            })
            .await?;

        info!(
            "Created campaign {} ({}, {} leads)",
            campaign.name, campaign.status, campaign.total_leads
        );
        Ok(campaign)
    }

    /// Replace the sequence; a draft with steps becomes paused
    pub async fn set_steps(&self, id: &str, steps: Vec<CampaignStep>) -> Result<Campaign> {
        validate_steps(&steps)?;
        self.modify(id, |campaign| {
            if campaign.status == CampaignStatus::Draft && !steps.is_empty() {
                campaign.status = CampaignStatus::Paused;
            }
            campaign.steps = steps;
            Ok(())
        })
        .await
    }

    /// Start sending. Already running campaigns are left as they are.
    pub async fn launch(&self, id: &str) -> Result<Campaign> {
        let campaign = self
            .modify(id, |campaign| match campaign.status {
                CampaignStatus::Paused | CampaignStatus::Running => {
                    campaign.status = CampaignStatus::Running;
                    Ok(())
                }
                other => Err(invalid_transition(&campaign.name, other, CampaignStatus::Running)),
            })
            .await?;
        info!("Campaign {} launched", campaign.name);
        Ok(campaign)
    }

    /// Stop sending. Already paused campaigns are left as they are.
    pub async fn pause(&self, id: &str) -> Result<Campaign> {
        let campaign = self
            .modify(id, |campaign| match campaign.status {
                CampaignStatus::Running | CampaignStatus::Paused => {
                    campaign.status = CampaignStatus::Paused;
                    Ok(())
                }
                other => Err(invalid_transition(&campaign.name, other, CampaignStatus::Paused)),
            })
            .await?;
        info!("Campaign {} paused", campaign.name);
        Ok(campaign)
    }

    /// Flip between running and paused
    pub async fn toggle(&self, id: &str) -> Result<Campaign> {
        let campaign = self
            .modify(id, |campaign| {
                campaign.status = match campaign.status {
                    CampaignStatus::Running => CampaignStatus::Paused,
                    CampaignStatus::Paused => CampaignStatus::Running,
                    other => {
                        return Err(invalid_transition(
                            &campaign.name,
                            other,
                            CampaignStatus::Running,
                        ))
                    }
                };
                Ok(())
            })
            .await?;
        info!("Campaign {} is now {}", campaign.name, campaign.status);
        Ok(campaign)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.workspace
            .campaigns()
            .update(|campaigns| {
                let next: Vec<_> = campaigns.iter().filter(|c| c.id != id).cloned().collect();
                if next.len() == campaigns.len() {
                    return Err(not_found(id));
                }
                Ok(Update::Replace(next, ()))
            })
            .await?;
        info!("Deleted campaign {}", id);
        Ok(())
    }

    /// AI drafted first email for a new campaign
    pub async fn draft_copy(&self, prompt: &str) -> Result<EmailDraft> {
        if prompt.trim().is_empty() {
            return Err(Error::Validation("Prompt must not be empty".to_string()));
        }
        Ok(self.copywriter.draft(prompt).await)
    }

    async fn modify<F>(&self, id: &str, f: F) -> Result<Campaign>
    where
        F: FnOnce(&mut Campaign) -> Result<()>,
    {
        self.workspace
            .campaigns()
            .update(|campaigns| {
                let index = campaigns
                    .iter()
                    .position(|c| c.id == id)
                    .ok_or_else(|| not_found(id))?;
                let mut next = campaigns.to_vec();
                f(&mut next[index])?;
                let updated = next[index].clone();
                Ok(Update::Replace(next, updated))
            })
            .await
    }
}

fn validate_steps(steps: &[CampaignStep]) -> Result<()> {
    for step in steps {
        if let CampaignStep::Wait { wait_days: 0, .. } = step {
            return Err(Error::Validation(
                "Wait steps must last at least one day".to_string(),
            ));
        }
    }
    Ok(())
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("Campaign not found: {}", id))
}

fn invalid_transition(name: &str, from: CampaignStatus, to: CampaignStatus) -> Error {
    Error::InvalidTransition(format!("Campaign {} cannot go from {} to {}", name, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{DisabledAssistant, COPY_FALLBACK};
    use pretty_assertions::assert_eq;
    use vibemail_storage::{MemoryStorage, SlotStorage};

    async fn manager() -> CampaignManager {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        let workspace = Arc::new(Workspace::load(storage).await.unwrap());
        let copywriter = Copywriter::new(Arc::new(DisabledAssistant), "VibeMail AI outreach");
        CampaignManager::new(workspace, copywriter)
    }

    #[tokio::test]
    async fn test_create_draft_then_add_steps() {
        let manager = manager().await;

        let draft = manager.create(CreateCampaign::default()).await.unwrap();
        assert_eq!(draft.status, CampaignStatus::Draft);
        assert_eq!(draft.name, "New Campaign");
        assert_eq!(draft.total_leads, 50);

        let err = manager.launch(&draft.id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));

        let ready = manager
            .set_steps(
                &draft.id,
                vec![CampaignStep::email("Hi", "Hello"), CampaignStep::wait(3)],
            )
            .await
            .unwrap();
        assert_eq!(ready.status, CampaignStatus::Paused);
        assert_eq!(ready.steps.len(), 2);

        let running = manager.launch(&draft.id).await.unwrap();
        assert_eq!(running.status, CampaignStatus::Running);
    }

    #[tokio::test]
    async fn test_create_with_steps_is_paused() {
        let manager = manager().await;

        let campaign = manager
            .create(CreateCampaign {
                name: Some("Q3 Enterprise".to_string()),
                total_leads: Some(200),
                steps: vec![CampaignStep::email("Subject", "Body")],
            })
            .await
            .unwrap();

        assert_eq!(campaign.status, CampaignStatus::Paused);
        assert_eq!(campaign.sent, 0);
        assert_eq!(manager.list(None).await.len(), 2);
        assert_eq!(manager.list(Some(CampaignStatus::Draft)).await.len(), 0);
        assert_eq!(manager.get(&campaign.id).await.unwrap(), campaign);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let manager = manager().await;

        let err = manager
            .create(CreateCampaign {
                total_leads: Some(0),
                ..CreateCampaign::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = manager
            .create(CreateCampaign {
                steps: vec![CampaignStep::wait(0)],
                ..CreateCampaign::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_running_and_paused() {
        let manager = manager().await;

        // seed campaign starts paused
        let campaign = manager.toggle("1").await.unwrap();
        assert_eq!(campaign.status, CampaignStatus::Running);
        assert_eq!(manager.list(Some(CampaignStatus::Running)).await.len(), 1);

        let campaign = manager.toggle("1").await.unwrap();
        assert_eq!(campaign.status, CampaignStatus::Paused);

        let campaign = manager.pause("1").await.unwrap();
        assert_eq!(campaign.status, CampaignStatus::Paused);
    }

    #[tokio::test]
    async fn test_toggle_draft_is_rejected() {
        let manager = manager().await;
        let draft = manager.create(CreateCampaign::default()).await.unwrap();

        let err = manager.toggle(&draft.id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
        assert_eq!(manager.get(&draft.id).await.unwrap().status, CampaignStatus::Draft);
    }

    #[tokio::test]
    async fn test_delete_campaign() {
        let manager = manager().await;

        manager.delete("1").await.unwrap();
        assert!(manager.list(None).await.is_empty());
        assert!(matches!(manager.delete("1").await, Err(Error::NotFound(_))));
        assert!(matches!(manager.toggle("1").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_draft_copy_falls_back() {
        let manager = manager().await;

        let draft = manager.draft_copy("book demos with founders").await.unwrap();
        assert_eq!(draft.body, COPY_FALLBACK);

        assert!(matches!(
            manager.draft_copy("  ").await,
            Err(Error::Validation(_))
        ));
    }
}
