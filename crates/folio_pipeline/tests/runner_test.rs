//! Tests for pipeline execution.

mod test_utils;

use std::io::{Cursor, Read};

use folio_core::{Artifact, Dimensions, GroupMember, MASTER_DOCUMENT_KEY, RunOutcome};
use folio_error::{GenerationErrorKind, PipelineErrorKind};
use folio_pipeline::{
    BuiltinDocument, CancellationToken, DocumentSpec, ImageSlot, PipelineRunner, ProgressReporter,
    RunnerConfig, Step, TableSpec, TextSlot,
};
use std::time::Duration;
use test_utils::{DriverCall, ScriptedDriver, lighthouse_spec};
use tokio::sync::mpsc;

fn archive_names(archive: &[u8]) -> anyhow::Result<Vec<String>> {
    let zip = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    Ok(names)
}

#[tokio::test]
async fn test_lighthouse_end_to_end() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = lighthouse_spec();

    let context = runner
        .execute(
            &spec,
            "a lighthouse keeper",
            &ProgressReporter::silent(),
            &CancellationToken::new(),
        )
        .await?;

    assert_eq!(
        context.keys().collect::<Vec<_>>(),
        vec!["user_prompt", "concept", "plot", "cover", MASTER_DOCUMENT_KEY]
    );
    assert_eq!(
        driver.text_calls(),
        vec![
            "Summarize: a lighthouse keeper".to_string(),
            "Plot from: text for: Summarize: a lighthouse keeper".to_string(),
        ]
    );
    assert_eq!(
        driver.image_calls(),
        vec![(
            "Cover for: text for: Plot from: text for: Summarize: a lighthouse keeper".to_string(),
            Dimensions::SQUARE
        )]
    );

    let outcome = runner
        .generate(
            &spec,
            "a lighthouse keeper",
            &ProgressReporter::silent(),
            &CancellationToken::new(),
        )
        .await;
    let RunOutcome::Completed { archive, file_name } = outcome else {
        panic!("expected completed outcome, got {:?}", outcome);
    };

    assert_eq!(file_name, "lighthouse.zip");
    assert_eq!(
        archive_names(&archive)?,
        vec!["concept.txt", "cover/image_1.png", "master_document.txt", "plot.txt"]
    );
    Ok(())
}

#[tokio::test]
async fn test_text_calls_use_document_and_step_roles() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "roles",
        "Roles",
        vec![
            Step::text("a", "{user_prompt}"),
            Step::text("b", "{a}").with_system_role("You are a critic."),
        ],
    )?;

    runner
        .execute(&spec, "p", &ProgressReporter::silent(), &CancellationToken::new())
        .await?;

    let roles: Vec<String> = driver
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            DriverCall::Text { system_role, .. } => Some(system_role),
            _ => None,
        })
        .collect();
    assert_eq!(
        roles,
        vec![
            "You are a helpful assistant specializing in Roles.".to_string(),
            "You are a critic.".to_string()
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_single_image_failure_keeps_group_shape() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new().fail_fetch_of(2);
    let runner = PipelineRunner::with_config(driver.clone(), RunnerConfig::new(3));
    let spec = DocumentSpec::new(
        "gallery",
        "Gallery",
        vec![Step::image_batch("gallery", "Scene: {user_prompt}", 4, Dimensions::LANDSCAPE)],
    )?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let context = runner
        .execute(&spec, "harbor", &ProgressReporter::new(tx), &CancellationToken::new())
        .await?;

    let group = context
        .get("gallery")
        .and_then(Artifact::as_group)
        .expect("gallery is a group");
    assert_eq!(
        group.names().collect::<Vec<_>>(),
        vec!["image_1.png", "image_2.png", "image_3.png", "image_4.png"]
    );
    assert_eq!(group.get("image_1.png"), Some(&GroupMember::Binary(vec![1; 4])));
    assert_eq!(group.get("image_2.png"), Some(&GroupMember::Binary(Vec::new())));
    assert_eq!(group.get("image_4.png"), Some(&GroupMember::Binary(vec![4; 4])));

    let messages: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|event| event.message().clone())
        .collect();
    assert!(messages.iter().any(|m| m == "Image 1 of 4 ready"));
    assert!(
        messages
            .iter()
            .any(|m| m.starts_with("Error generating image 2:") && m.contains("connection reset"))
    );
    Ok(())
}

#[tokio::test]
async fn test_image_generation_failure_is_absorbed() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new().fail_image_containing("forbidden");
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "mixed",
        "Mixed",
        vec![
            Step::image_slots(
                "art",
                "{user_prompt}",
                vec![
                    ImageSlot::new("ok.png", Dimensions::SQUARE),
                    ImageSlot::new("bad.png", Dimensions::PORTRAIT).with_prefix("forbidden "),
                ],
            ),
            Step::text("summary", "Summarize {art}"),
        ],
    )?;

    let context = runner
        .execute(&spec, "sea", &ProgressReporter::silent(), &CancellationToken::new())
        .await?;

    let group = context.get("art").and_then(Artifact::as_group).expect("group");
    assert!(group.get("bad.png").is_some_and(GroupMember::is_empty));
    assert!(!group.get("ok.png").is_some_and(GroupMember::is_empty));
    assert_eq!(
        context.get("summary").and_then(Artifact::as_text),
        Some("text for: Summarize ok.png, bad.png")
    );
    assert!(driver.calls().contains(&DriverCall::Image {
        prompt: "forbidden sea".to_string(),
        size: Dimensions::PORTRAIT,
    }));
    Ok(())
}

#[tokio::test]
async fn test_forward_reference_fails_before_remote_call() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "broken",
        "Broken",
        vec![
            Step::text("concept", "Summarize: {user_prompt}"),
            Step::text("plot", "Plot from: {epilogue}"),
            Step::text("epilogue", "Ending for {concept}"),
        ],
    )?;
    assert!(spec.validate().is_err());

    let err = runner
        .execute(&spec, "p", &ProgressReporter::silent(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        PipelineErrorKind::UnresolvedPlaceholder {
            step: "plot".to_string(),
            key: "epilogue".to_string(),
        }
    );
    assert_eq!(driver.text_calls(), vec!["Summarize: p".to_string()]);

    let outcome = runner
        .generate(&spec, "p", &ProgressReporter::silent(), &CancellationToken::new())
        .await;
    assert_eq!(
        outcome,
        RunOutcome::Failed("Step 'plot' references unknown or later key 'epilogue'".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_self_reference_in_image_batch_fails_before_any_image() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "selfish",
        "Selfish",
        vec![Step::image_batch("cover", "More of {cover}", 2, Dimensions::SQUARE)],
    )?;

    let result = runner
        .execute(&spec, "p", &ProgressReporter::silent(), &CancellationToken::new())
        .await;

    assert!(result.is_err());
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_text_failure_is_fatal_and_names_step() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new().fail_text_containing(
        "Plot from",
        GenerationErrorKind::Provider {
            status: 429,
            message: "Rate limit reached".to_string(),
        },
    );
    let runner = PipelineRunner::new(driver.clone());

    let outcome = runner
        .generate(
            &lighthouse_spec(),
            "a lighthouse keeper",
            &ProgressReporter::silent(),
            &CancellationToken::new(),
        )
        .await;

    let RunOutcome::Failed(message) = outcome else {
        panic!("expected failure, got {:?}", outcome);
    };
    assert!(message.starts_with("Step 'plot' failed:"));
    assert!(message.contains("Rate limit reached"));
    assert!(driver.image_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_text_batch_member_failure_is_fatal() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new()
        .fail_text_containing("enemy", GenerationErrorKind::Transport("timed out".to_string()));
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "scripts",
        "Scripts",
        vec![
            Step::text_batch(
                "unity_scripts",
                vec![
                    TextSlot::new("script_1.cs", "Player for {user_prompt}"),
                    TextSlot::new("script_2.cs", "enemy for {user_prompt}"),
                    TextSlot::new("script_3.cs", "Door for {user_prompt}"),
                ],
            ),
            Step::text("recap", "Recap {unity_scripts}"),
        ],
    )?;

    let err = runner
        .execute(&spec, "maze", &ProgressReporter::silent(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        PipelineErrorKind::StepFailed {
            step: "unity_scripts".to_string(),
            reason: "script_2.cs: Transport error: timed out".to_string(),
        }
    );
    assert_eq!(driver.text_calls().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_at_100() -> anyhow::Result<()> {
    let runner = PipelineRunner::new(ScriptedDriver::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let outcome = runner
        .generate(
            &lighthouse_spec(),
            "a lighthouse keeper",
            &ProgressReporter::new(tx),
            &CancellationToken::new(),
        )
        .await;
    assert!(outcome.is_completed());

    let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    let percents: Vec<u8> = events.iter().map(|event| *event.percent()).collect();

    assert!(percents.first().is_some_and(|p| *p > 0));
    assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(percents.iter().filter(|p| **p == 100).count(), 1);
    assert_eq!(percents.last(), Some(&100));

    let messages: Vec<&str> = events.iter().map(|event| event.message().as_str()).collect();
    assert!(messages.contains(&"Generating plot..."));
    assert!(messages.contains(&"Generating master document..."));
    assert!(messages.contains(&"Packaging into ZIP..."));
    assert_eq!(messages.last(), Some(&"ZIP package created."));
    Ok(())
}

#[tokio::test]
async fn test_cancel_between_steps_reports_cancelled() -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let driver = ScriptedDriver::new().cancel_after_text_calls(1, cancel.clone());
    let runner = PipelineRunner::new(driver.clone());

    let outcome = runner
        .generate(&lighthouse_spec(), "p", &ProgressReporter::silent(), &cancel)
        .await;

    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(driver.text_calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_table_step_renders_csv_without_remote_call() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "budget",
        "Budget",
        vec![Step::table(
            "budget.csv",
            folio_pipeline::TableSpec::new(
                vec!["Item".to_string(), "Cost".to_string()],
                vec![
                    vec!["{user_prompt}".to_string(), "10".to_string()],
                    vec!["Print".to_string(), "2.5".to_string()],
                ],
            )
            .with_total_column("Cost"),
        )],
    )?;

    let outcome = runner
        .generate(&spec, "Ads", &ProgressReporter::silent(), &CancellationToken::new())
        .await;
    let RunOutcome::Completed { archive, .. } = outcome else {
        panic!("expected completed outcome");
    };

    let mut zip = zip::ZipArchive::new(Cursor::new(archive.as_slice()))?;
    let mut csv = String::new();
    zip.by_name("budget.csv")?.read_to_string(&mut csv)?;
    assert_eq!(csv, "Item,Cost\r\nAds,10\r\nPrint,2.5\r\nTotal,12.5\r\n");
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_slow_first_slot_keeps_slot_order() -> anyhow::Result<()> {
    let driver =
        ScriptedDriver::new().delay_image_containing("north", Duration::from_millis(500));
    let runner = PipelineRunner::with_config(driver.clone(), RunnerConfig::new(4));
    let spec = DocumentSpec::new(
        "compass",
        "Compass",
        vec![Step::image_slots(
            "views",
            "{user_prompt}",
            ["north", "east", "south", "west"]
                .into_iter()
                .map(|side| {
                    ImageSlot::new(format!("{}.png", side), Dimensions::SQUARE)
                        .with_prefix(format!("{} view of ", side))
                })
                .collect(),
        )],
    )?;

    let context = runner
        .execute(&spec, "a harbor", &ProgressReporter::silent(), &CancellationToken::new())
        .await?;

    let group = context
        .get("views")
        .and_then(Artifact::as_group)
        .expect("views is a group");
    assert_eq!(
        group.names().collect::<Vec<_>>(),
        vec!["north.png", "east.png", "south.png", "west.png"]
    );

    // Image URLs are numbered in request order; each member must hold its own bytes.
    let requested: Vec<String> = driver.image_calls().into_iter().map(|(p, _)| p).collect();
    for side in ["north", "east", "south", "west"] {
        let n = requested
            .iter()
            .position(|prompt| prompt == &format!("{} view of a harbor", side))
            .expect("slot was requested")
            + 1;
        assert_eq!(
            group.get(&format!("{}.png", side)),
            Some(&GroupMember::Binary(vec![n as u8; 4]))
        );
    }

    let north = requested
        .iter()
        .position(|prompt| prompt.starts_with("north"))
        .expect("north was requested")
        + 1;
    assert_eq!(
        driver.fetch_calls().last(),
        Some(&format!("mock://image/{}", north)),
        "the delayed slot finishes last"
    );
    Ok(())
}

#[tokio::test]
async fn test_builtin_marketing_campaign_end_to_end() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = BuiltinDocument::MarketingCampaign.load()?;

    let outcome = runner
        .generate(&spec, "eco sneakers", &ProgressReporter::silent(), &CancellationToken::new())
        .await;
    let RunOutcome::Completed { archive, file_name } = outcome else {
        panic!("expected completed outcome, got {:?}", outcome);
    };

    assert_eq!(file_name, "marketing_campaign.zip");
    assert_eq!(
        archive_names(&archive)?,
        vec![
            "budget_spreadsheet.csv",
            "campaign_concept.txt",
            "images/banner.png",
            "images/instagram_background.png",
            "images/square_post_1.png",
            "images/square_post_2.png",
            "images/square_post_3.png",
            "marketing_plan.txt",
            "master_document.txt",
            "recap.txt",
            "resources_tips.txt",
            "social_media_schedule.csv",
        ]
    );
    assert_eq!(
        driver.image_calls().into_iter().map(|(_, size)| size).collect::<Vec<_>>(),
        vec![
            Dimensions::LANDSCAPE,
            Dimensions::PORTRAIT,
            Dimensions::SQUARE,
            Dimensions::SQUARE,
            Dimensions::SQUARE,
        ]
    );

    let mut zip = zip::ZipArchive::new(Cursor::new(archive.as_slice()))?;
    let mut budget = String::new();
    zip.by_name("budget_spreadsheet.csv")?.read_to_string(&mut budget)?;
    assert!(budget.ends_with("Total,200,\r\n"), "{}", budget);

    let mut schedule = String::new();
    zip.by_name("social_media_schedule.csv")?.read_to_string(&mut schedule)?;
    assert!(schedule.contains("text for: Create a detailed marketing campaign concept"));
    Ok(())
}

#[tokio::test]
async fn test_table_key_with_extension_is_substituted() -> anyhow::Result<()> {
    let driver = ScriptedDriver::new();
    let runner = PipelineRunner::new(driver.clone());
    let spec = DocumentSpec::new(
        "summary",
        "Summary",
        vec![
            Step::table(
                "budget.csv",
                TableSpec::new(vec!["Cost".to_string()], vec![vec!["5".to_string()]]),
            ),
            Step::text("summary", "Summarize {budget.csv}"),
        ],
    )?;
    spec.validate()?;

    runner
        .execute(&spec, "p", &ProgressReporter::silent(), &CancellationToken::new())
        .await?;

    let sent = driver.text_calls();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].contains("{budget.csv}"));
    assert!(sent[0].starts_with("Summarize [binary artifact, "));
    Ok(())
}
