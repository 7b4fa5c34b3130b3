//! Headless walk-through of the viewer lifecycle.

use anyhow::Result;
use colored::Colorize;
use m360_core::config::ViewerSettings;
use m360_core::viewer::{
    HeadlessHost, HostNode, MediaEvent, Playback, ScriptEvent, TourStage, VideoSource, ViewerKind,
    ViewerPreference, ViewerState,
};

pub struct TourOptions {
    pub path: String,
    pub is_360: bool,
    pub sphere: bool,
    pub simulate_failure: bool,
}

pub fn run(settings: &ViewerSettings, options: TourOptions) -> Result<()> {
    let preference = if options.sphere {
        ViewerPreference::ManualSphere
    } else {
        ViewerPreference::Auto
    };
    let mut stage = TourStage::new(HeadlessHost::new(), settings.clone()).with_preference(preference);

    let source = VideoSource::new(options.path, options.is_360);
    println!(
        "{} {} ({}, 360°: {})",
        "Video:".bold(),
        source.path,
        source.mime_type,
        source.is_360
    );
    stage.show(source);
    report(&stage, "mount");

    if stage.viewer().map(|v| v.kind()) == Some(ViewerKind::PanoramicScene) {
        if options.simulate_failure {
            stage.script_event(ScriptEvent::Failed)?;
            report(&stage, "primary CDN failed");
            stage.script_event(ScriptEvent::Failed)?;
            report(&stage, "fallback CDN failed");
        } else {
            stage.script_event(ScriptEvent::Loaded)?;
            report(&stage, "library loaded");
        }
    } else if options.simulate_failure {
        stage.media_event(MediaEvent::Error(Some("network error".to_string())))?;
        report(&stage, "media error");
    }

    if stage.viewer().is_some_and(|v| v.state() == &ViewerState::Loading) {
        stage.media_event(MediaEvent::LoadedData)?;
        report(&stage, "loadeddata");
        stage.media_event(MediaEvent::CanPlay)?;
        report(&stage, "canplay");
    }

    if stage.viewer().is_some_and(|v| v.state().is_active()) {
        stage.pause()?;
        report(&stage, "pause");
        let muted = stage.toggle_mute()?;
        report(&stage, if muted { "mute" } else { "unmute" });
        stage.reset_view()?;
        report(&stage, "reset view");
    }

    stage.back_to_outside();
    println!(
        "{:<22} {} nodes left, {} removed",
        "back to outside".cyan(),
        stage.host().node_count(),
        stage.host().removed_nodes().len()
    );
    for url in stage.host().script_requests() {
        println!("  {} {}", "script requested:".bright_black(), url);
    }
    Ok(())
}

fn report(stage: &TourStage<HeadlessHost>, step: &str) {
    let Some(viewer) = stage.viewer() else {
        println!("{:<22} {}", step.cyan(), "no viewer".bright_black());
        return;
    };
    let state = viewer.state();
    let state_label = match state {
        ViewerState::Error(_) => state.name().red().to_string(),
        ViewerState::Playing => state.name().green().to_string(),
        _ => state.name().yellow().to_string(),
    };
    println!("{:<22} {} [{}]", step.cyan(), viewer.kind(), state_label);

    for (_, node) in stage.host().nodes() {
        if let HostNode::Panel { title, lines } = node {
            println!("  {}", title.red().bold());
            for line in lines {
                println!("    {line}");
            }
        }
    }
}
