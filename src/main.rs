mod config;
mod quiz;
mod view;

use config::Config;
use dotenv::dotenv;
use log::{debug, error, info, warn};
use quiz::{bank::QUESTIONS, session::State};
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::{ChatId, InputFile, MessageId},
    utils::command::BotCommands,
};
use view::{render, Action, Screen};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type QuizStorage = std::sync::Arc<ErasedStorage<State>>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "start the quiz over with freshly shuffled answers.")]
    Start,
    #[command(description = "show this text.")]
    Help,
}

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv().is_ok();
    pretty_env_logger::init();
    if !dotenv_loaded {
        debug!("No .env file, reading settings from the environment only");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    info!("Starting quiz bot for {}...", config.site_url());

    let bot = Bot::from_env();
    // Sessions are per chat and only live as long as the process.
    let storage: QuizStorage = InMemStorage::<State>::new().erase();

    let messages = Update::filter_message()
        .enter_dialogue::<Message, ErasedStorage<State>, State>()
        .branch(dptree::entry().filter_command::<Command>().endpoint(command))
        .branch(dptree::case![State::Start].endpoint(greet))
        .branch(dptree::endpoint(remind));

    let buttons = Update::filter_callback_query()
        .enter_dialogue::<CallbackQuery, ErasedStorage<State>, State>()
        .endpoint(button);

    Dispatcher::builder(bot, dptree::entry().branch(messages).branch(buttons))
        .dependencies(dptree::deps![storage, config])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// Sends the screen as a photo when it has one. A photo Telegram can't fetch falls back to
/// plain text so the buttons still arrive.
async fn send_screen(bot: &Bot, chat_id: ChatId, screen: &Screen) -> HandlerResult {
    if let Some(image) = &screen.image {
        let sent = bot
            .send_photo(chat_id, InputFile::url(image.clone()))
            .caption(screen.text.clone())
            .reply_markup(screen.keyboard())
            .await;
        match sent {
            Ok(_) => return Ok(()),
            Err(err) => warn!("Could not send {image} to chat {chat_id}: {err}"),
        }
    }

    bot.send_message(chat_id, screen.text.clone())
        .reply_markup(screen.keyboard())
        .await?;
    Ok(())
}

async fn command(
    bot: Bot,
    dialogue: QuizDialogue,
    config: Config,
    cmd: Command,
    msg: Message,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            let state = State::start(QUESTIONS);
            info!("Chat {} mounted a new quiz session", msg.chat.id);
            let screen = render(&state, &config);
            dialogue.update(state).await?;
            send_screen(&bot, msg.chat.id, &screen).await?;
        }
    }
    Ok(())
}

async fn greet(bot: Bot, config: Config, msg: Message) -> HandlerResult {
    send_screen(&bot, msg.chat.id, &render(&State::Start, &config)).await
}

/// Free text mid-quiz: show the current screen again.
async fn remind(bot: Bot, dialogue: QuizDialogue, config: Config, msg: Message) -> HandlerResult {
    let state = dialogue.get_or_default().await?;
    if let Some(category) = state.result() {
        debug!("Chat {} sent text after finishing as a {category}", msg.chat.id);
    }
    send_screen(&bot, msg.chat.id, &render(&state, &config)).await
}

async fn button(
    bot: Bot,
    dialogue: QuizDialogue,
    config: Config,
    q: CallbackQuery,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();
    let action = match q.data.as_deref().map(str::parse::<Action>) {
        Some(Ok(action)) => action,
        Some(Err(err)) => {
            warn!("Ignoring button press in chat {chat_id}: {err}");
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
        None => {
            debug!("Ignoring button press without data in chat {chat_id}");
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    };

    let mut state = dialogue.get_or_default().await?;
    let outcome = match action {
        Action::Start => {
            state = State::start(QUESTIONS);
            info!("Chat {chat_id} mounted a new quiz session");
            Ok(())
        }
        Action::Answer {
            session,
            question,
            option,
        } => state.select(session, question, option).map(|category| {
            let answered = state.session().map_or(0, |s| s.selections().len());
            debug!("Chat {chat_id} answered question {question} with {category} ({answered} so far)");
        }),
        Action::SeeResult => state.compute_result().map(|category| {
            info!("Chat {chat_id} is a {category}");
        }),
        Action::Retake => state.retake(QUESTIONS).map(|()| {
            info!("Chat {chat_id} is retaking the quiz");
        }),
    };

    if let Err(err) = outcome {
        debug!("Rejected {action} in chat {chat_id}: {err}");
        bot.answer_callback_query(q.id)
            .text("This button is no longer active")
            .await?;
        return Ok(());
    }
    let screen = render(&state, &config);
    dialogue.update(state).await?;
    bot.answer_callback_query(q.id).await?;

    // The pressed keyboard is spent. Failing to remove it only leaves dead buttons behind.
    if let Some(message) = &q.message {
        let _ = clear_keyboard(&bot, chat_id, message.id).await;
    }

    send_screen(&bot, chat_id, &screen).await
}

async fn clear_keyboard(bot: &Bot, chat_id: ChatId, message_id: MessageId) -> HandlerResult {
    bot.edit_message_reply_markup(chat_id, message_id).await?;
    Ok(())
}
