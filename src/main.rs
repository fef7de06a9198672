use std::process;

use richdoc::{
    application::{
        error::AppError,
        render::{
            PresentationOptions, RenderPipelineConfig, RenderRequest, RenderService,
            configure_render_service, detect, render_service,
        },
    },
    config::{self, AnalyzeArgs, Command, RenderArgs},
    domain::content::RawContent,
    infra::{input::read_content, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;
    configure_render_service(RenderPipelineConfig::from(&settings.render))?;

    match cli_args.command {
        Command::Render(args) => run_render(&settings, args),
        Command::Analyze(args) => run_analyze(args),
    }
}

fn run_render(settings: &config::Settings, args: RenderArgs) -> Result<(), AppError> {
    let content = RawContent::from(read_content(&args.input)?);
    let request = RenderRequest::new(content)
        .with_presentation(PresentationOptions::from(&settings.presentation));

    let output = render_service().render(&request);
    info!(
        target = "richdoc::render",
        input = %args.input.display(),
        outcome = output.outcome.as_str(),
        is_long = output.is_long,
        "rendered content"
    );
    println!("{}", output.html());
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let content = RawContent::from(read_content(&args.input)?);
    let service = render_service();
    let length = service.analyze(&content);

    println!("format: {}", detect(&content).label());
    println!("characters: {}", length.characters);
    println!("is_long: {}", length.is_long);
    Ok(())
}
