//! Subcommand implementations
//!
//! Each form command returns `Ok(true)` when the form reached its success
//! transition.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use authform_lib::action::{Notifier, Router, SubmitAction, Toast, ToastKind};
use authform_lib::controller::DEFAULT_FALLBACK_MESSAGE;
use authform_lib::forms::StockForm;
use authform_lib::http::HttpSubmitAction;
use authform_lib::server::{AccountStore, StubServer};
use authform_lib::simulated::SimulatedAction;
use authform_lib::view::{FormLayout, FormView, TextRenderer};
use authform_lib::{
    AuthConfig, Form, LoadingScope, Provider, SocialAuthTrigger, SubmissionController, SubmitEvent,
    SubmitStatus,
};

use crate::prompt::{Prompter, parse_field};
use crate::{ActionArgs, FormArgs};

/// Account seeded when `serve` is started without any.
const DEMO_ACCOUNT: (&str, &str) = ("test@example.com", "password123");

// =============================================================================
// Terminal collaborators
// =============================================================================

/// Prints navigation instead of performing it.
struct TerminalRouter;

impl Router for TerminalRouter {
    fn navigate(&self, path: &str) {
        log::info!("Navigating to {}", path);
        println!("Redirecting to {}", path);
    }
}

/// Prints toasts to stderr.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show(&self, toast: Toast) {
        let prefix = match toast.kind {
            ToastKind::Info => "info",
            ToastKind::Success => "ok",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        };
        eprintln!("[{}] {}", prefix, toast.message);
    }
}

// =============================================================================
// Form commands
// =============================================================================

pub async fn sign_in(config: AuthConfig, action: ActionArgs, args: FormArgs) -> Result<bool, String> {
    let config = apply_action_args(config, &action);
    let submit: Arc<dyn SubmitAction> = if action.simulate {
        Arc::new(SimulatedAction::succeed(config.redirect_target.clone()).with_delay(config.simulated_delay))
    } else {
        Arc::new(HttpSubmitAction::sign_in(&config).map_err(|e| e.to_string())?)
    };

    let status = run_form(StockForm::SignIn, submit, &config, &args).await?;
    Ok(matches!(status, SubmitStatus::Succeeded { .. }))
}

pub async fn sign_up(config: AuthConfig, action: ActionArgs, args: FormArgs) -> Result<bool, String> {
    let config = apply_action_args(config, &action);
    let submit: Arc<dyn SubmitAction> = if action.simulate {
        Arc::new(SimulatedAction::succeed(config.redirect_target.clone()).with_delay(config.simulated_delay))
    } else {
        Arc::new(HttpSubmitAction::sign_up(&config).map_err(|e| e.to_string())?)
    };

    let status = run_form(StockForm::SignUp, submit, &config, &args).await?;
    Ok(matches!(status, SubmitStatus::Succeeded { .. }))
}

pub async fn register(args: FormArgs) -> Result<bool, String> {
    let config = AuthConfig::default();
    let submit = Arc::new(SimulatedAction::succeed(config.redirect_target.clone()).with_delay(Duration::ZERO));

    let form = Form::with_values(StockForm::Registration.initial_values());
    let status = fill_and_submit(StockForm::Registration, form.clone(), submit, &config, &args).await?;

    if !matches!(status, SubmitStatus::Succeeded { .. }) {
        return Ok(false);
    }

    let values = form.values();
    println!("Form Submitted Successfully!");
    println!("Thank you, {}!", values.text("name"));
    println!("We'll send a confirmation to {}", values.text("email"));
    Ok(true)
}

fn apply_action_args(mut config: AuthConfig, action: &ActionArgs) -> AuthConfig {
    if let Some(base_url) = &action.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(redirect) = &action.redirect {
        config.redirect_target = redirect.clone();
    }
    config
}

async fn run_form(
    stock: StockForm,
    submit: Arc<dyn SubmitAction>,
    config: &AuthConfig,
    args: &FormArgs,
) -> Result<SubmitStatus, String> {
    let form = Form::with_values(stock.initial_values());
    fill_and_submit(stock, form, submit, config, args).await
}

/// Prompt for every field, submit, and re-prompt invalid fields until the
/// form settles with something other than a validation failure.
async fn fill_and_submit(
    stock: StockForm,
    form: Form,
    submit: Arc<dyn SubmitAction>,
    config: &AuthConfig,
    args: &FormArgs,
) -> Result<SubmitStatus, String> {
    let layout = stock.layout();
    let schema = stock.schema().map_err(|e| e.to_string())?;

    let fallback = if config.fallback_message == DEFAULT_FALLBACK_MESSAGE {
        stock.fallback_message().unwrap_or(DEFAULT_FALLBACK_MESSAGE).to_string()
    } else {
        config.fallback_message.clone()
    };

    let controller = SubmissionController::new(form.clone(), schema, submit, TerminalRouter)
        .with_notifier(TerminalNotifier)
        .with_fallback_message(fallback);

    let mut preset = Vec::new();
    for (name, raw) in &args.values {
        let field = layout
            .get(name)
            .ok_or_else(|| format!("{} has no field '{}'", stock, name))?;
        form.set_value(name.clone(), parse_field(field, raw));
        preset.push(name.as_str());
    }

    if args.show_password {
        for field in layout.fields.iter().filter(|f| f.is_secret()) {
            form.toggle_visibility(&field.name);
        }
    }

    let mut prompter = Prompter::new();
    let mut view = TextRenderer::new();

    println!("{}", layout.title);
    if let Some(subtitle) = &layout.subtitle {
        println!("{}", subtitle);
    }
    for field in layout.fields.iter().filter(|f| !preset.contains(&f.name.as_str())) {
        let value = prompter.field(field).await?;
        form.set_value(field.name.clone(), value);
    }

    loop {
        let status = submit_once(&controller, &form, &layout).await;
        view.render(&form.snapshot(), &layout);
        println!("\n{}", view.output());

        if status != SubmitStatus::Invalid {
            return Ok(status);
        }
        fix_invalid_fields(&controller, &form, &layout, &mut prompter).await?;
    }
}

async fn submit_once(controller: &SubmissionController, form: &Form, layout: &FormLayout) -> SubmitStatus {
    let mut event = SubmitEvent::new();
    let (status, ()) = tokio::join!(controller.on_submit(&mut event), async {
        tokio::task::yield_now().await;
        if form.is_submitting() {
            println!("{}", layout.loading_label);
        }
    });
    status
}

/// Re-prompt each field with an error until it validates on its own.
async fn fix_invalid_fields(
    controller: &SubmissionController,
    form: &Form,
    layout: &FormLayout,
    prompter: &mut Prompter,
) -> Result<(), String> {
    let errors = form.errors();

    for field in layout.fields.iter().filter(|f| errors.contains(&f.name)) {
        loop {
            let value = prompter.field(field).await?;
            form.set_value(field.name.clone(), value);
            match controller.validate_field(&field.name) {
                Some(message) => println!("  {}", message),
                None => break,
            }
        }
    }

    Ok(())
}

// =============================================================================
// Server
// =============================================================================

pub async fn serve(addr: SocketAddr, seed: Vec<(String, String)>) -> Result<bool, String> {
    let accounts = AccountStore::new();
    if seed.is_empty() {
        accounts.insert(DEMO_ACCOUNT.0, DEMO_ACCOUNT.1);
    }
    for (email, password) in &seed {
        if !accounts.insert(email, password) {
            log::warn!("Duplicate account {} ignored", email);
        }
    }

    let server = StubServer::bind(addr, accounts).await.map_err(|e| e.to_string())?;
    println!("Stub auth server listening on {}", server.base_url());
    println!("{} account(s); press Ctrl+C to stop", server.accounts().len());

    server
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|e| e.to_string())?;

    Ok(true)
}

// =============================================================================
// Social
// =============================================================================

pub async fn social(
    config: AuthConfig,
    provider: &str,
    fail: bool,
    scope: Option<LoadingScope>,
    sign_up: bool,
) -> Result<bool, String> {
    let provider = Provider::from(provider);
    let stock = if sign_up { StockForm::SignUp } else { StockForm::SignIn };

    let action = if fail {
        SimulatedAction::reject_without_message()
    } else {
        SimulatedAction::succeed(config.redirect_target.clone())
    }
    .with_delay(config.simulated_delay);

    let form = Form::with_values(stock.initial_values());
    let trigger = SocialAuthTrigger::new(form.clone(), action, TerminalRouter)
        .with_scope(scope.unwrap_or(config.loading_scope))
        .with_verb(stock.social_verb())
        .with_notifier(TerminalNotifier);

    println!("Continuing with {}...", provider.label());
    let status = trigger.trigger(provider).await;

    if let Some(banner) = form.top_level_error() {
        println!("{}", banner);
    }
    Ok(matches!(status, SubmitStatus::Succeeded { .. }))
}
