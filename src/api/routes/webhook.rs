use std::time::Instant;

use axum::{extract::State, response::IntoResponse, Form};
use tracing::{info, warn};

use crate::api::models::InboundSms;
use crate::api::AppState;
use crate::pipeline::{reply, Submission};

/// Empty TwiML body; the real reply goes out of band once processing ends.
const TWIML_ACK: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";

fn twiml_ack() -> impl IntoResponse {
    ([("content-type", "application/xml")], TWIML_ACK)
}

/// Gateway webhook. Acknowledges immediately and runs the pipeline in a
/// spawned task so a burst of submissions never stalls the gateway's
/// delivery loop.
pub async fn receive_sms(
    State(state): State<AppState>,
    Form(inbound): Form<InboundSms>,
) -> impl IntoResponse {
    info!(
        from = %inbound.from,
        media = inbound.media_count(),
        content_type = inbound.media_content_type.as_deref(),
        "Inbound submission"
    );

    let media_url = match (inbound.media_count(), &inbound.media_url) {
        (n, Some(url)) if n > 0 => url.clone(),
        _ => {
            prompt_for_image(&state, &inbound.from).await;
            return twiml_ack();
        }
    };

    let image = match download_media(&state, &media_url).await {
        Ok(bytes) => bytes,
        Err(reason) => {
            warn!(from = %inbound.from, reason, "Media download failed");
            prompt_for_image(&state, &inbound.from).await;
            return twiml_ack();
        }
    };

    let submission = Submission {
        image,
        caption: inbound.body.clone(),
        sender: inbound.from.clone(),
    };

    let id = uuid::Uuid::new_v4().to_string();
    state.active.insert(id.clone(), Instant::now());
    let pipeline = state.pipeline.clone();
    let active = state.active.clone();
    tokio::spawn(async move {
        pipeline.handle(submission).await;
        active.remove(&id);
    });

    twiml_ack()
}

async fn download_media(state: &AppState, url: &str) -> Result<Vec<u8>, String> {
    let resp = state.http.get(url).send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("media endpoint returned {}", resp.status()));
    }
    let bytes = resp.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

async fn prompt_for_image(state: &AppState, to: &str) {
    if let Err(e) = state.pipeline.notify(to, reply::NO_MEDIA_PROMPT).await {
        warn!(to, error = %e, "Prompt delivery failed");
    }
}
