
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use regburst::args::PositiveUsize;
use regburst::batch::{
    BatchConfig, BatchDispatcher, TrialEvent, TrialOutcome, event_channel, run_batch,
};
use regburst::http::{HttpTransport, ResponseBody, TransportErrorKind};
use regburst::metrics::summarize;

use support_server::{refused_url, spawn_registration_server_or_skip};

fn batch_config(url: String, trials: usize) -> Result<BatchConfig, String> {
    let trials = PositiveUsize::try_from(trials).map_err(|err| err.to_string())?;
    Ok(BatchConfig {
        target_url: url,
        trial_count: trials,
        max_connections: trials,
        timeout: Duration::from_secs(5),
        ..BatchConfig::default()
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_ten_unique_registrations_succeed() -> Result<(), String> {
    let Some((url, _server)) = spawn_registration_server_or_skip(&[])? else {
        return Ok(());
    };
    let results = run_batch(batch_config(url, 10)?)
        .await
        .map_err(|err| err.to_string())?;

    let indices: Vec<usize> = results.iter().map(|result| result.index()).collect();
    if indices != (1..=10).collect::<Vec<_>>() {
        return Err(format!("Unexpected indices: {:?}", indices));
    }
    let fields: HashSet<&str> = results.iter().map(|result| result.unique_field()).collect();
    if fields.len() != 10 {
        return Err(format!("Expected 10 distinct emails, got {}", fields.len()));
    }
    for result in &results {
        if result.outcome() != TrialOutcome::Success || result.status_code() != Some(200) {
            return Err(format!("Trial {} did not succeed: {:?}", result.index(), result));
        }
        let echoed = match result.body() {
            Some(ResponseBody::Structured(value)) => value["id"].as_str().map(str::to_owned),
            Some(ResponseBody::Raw(_)) | None => None,
        };
        if echoed.as_deref() != Some(result.unique_field()) {
            return Err(format!("Trial {} body did not echo its email", result.index()));
        }
    }

    let summary = summarize(&results);
    if summary.success_count != 10 || summary.failure_count != 0 {
        return Err(format!("Unexpected summary: {:?}", summary));
    }
    if summary.success_latency.is_none() {
        return Err("Expected success latency".to_owned());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_duplicate_rejection_counts_as_failure() -> Result<(), String> {
    let Some((url, _server)) = spawn_registration_server_or_skip(&[4])? else {
        return Ok(());
    };
    let results = run_batch(batch_config(url, 10)?)
        .await
        .map_err(|err| err.to_string())?;
    let summary = summarize(&results);

    if summary.success_count != 9 || summary.failure_count != 1 {
        return Err(format!("Unexpected summary: {:?}", summary));
    }
    let rejected = results
        .iter()
        .find(|result| result.index() == 4)
        .ok_or("Missing trial 4")?;
    if rejected.outcome() != TrialOutcome::HttpFailure || rejected.status_code() != Some(409) {
        return Err(format!("Unexpected trial 4: {:?}", rejected));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_refused_connections_become_transport_errors() -> Result<(), String> {
    let results = run_batch(batch_config(refused_url()?, 5)?)
        .await
        .map_err(|err| err.to_string())?;
    let summary = summarize(&results);

    if summary.success_count != 0 || summary.transport_error_count != 5 {
        return Err(format!("Unexpected summary: {:?}", summary));
    }
    for result in &results {
        let detail = result
            .error_detail()
            .ok_or_else(|| format!("Trial {} has no error detail", result.index()))?;
        if detail.kind != TransportErrorKind::Connect || detail.message.is_empty() {
            return Err(format!("Unexpected error detail: {}", detail));
        }
        if result.status_code().is_some() || result.response_headers().is_some() {
            return Err("Transport errors carry no response".to_owned());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn e2e_probe_reports_cors_headers() -> Result<(), String> {
    let Some((url, _server)) = spawn_registration_server_or_skip(&[])? else {
        return Ok(());
    };
    let config = batch_config(url, 3)?;
    let transport = Arc::new(HttpTransport::new(&config).map_err(|err| err.to_string())?);
    let (events_tx, mut events_rx) = event_channel();
    let dispatcher = BatchDispatcher::new(config, transport).with_events(events_tx);
    let results = dispatcher.run().await;
    drop(dispatcher);

    let mut probes = 0_usize;
    let mut finished = 0_usize;
    while let Some(event) = events_rx.recv().await {
        match event {
            TrialEvent::Probed { index, outcome } => {
                let probe = outcome.map_err(|err| format!("Probe {} failed: {}", index, err))?;
                if probe.status != 204
                    || probe
                        .access_control
                        .get("access-control-allow-methods")
                        .map(String::as_str)
                        != Some("POST, OPTIONS")
                {
                    return Err(format!("Unexpected probe: {:?}", probe));
                }
                probes = probes.saturating_add(1);
            }
            TrialEvent::Finished(_) => finished = finished.saturating_add(1),
        }
    }

    if probes != 3 || finished != 3 || results.len() != 3 {
        return Err(format!(
            "Expected 3 probes and 3 completions, got {} and {}",
            probes, finished
        ));
    }
    Ok(())
}
