//! Filepal application binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Open the state store (SQLite, or memory with --in-memory)
//! 3. Restore the stored file collection, falling back to the seed
//! 4. Restore the previous conversation and run the interactive shell

mod cli;
mod seed;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use filepal_chat::{ChatError, ChatOrchestrator, ChatStorage, Message, Sender};
use filepal_core::config::{DisplayConfig, FilepalConfig};
use filepal_core::format::{file_extension, format_file_size};
use filepal_core::types::FileRecord;
use filepal_storage::{
    sort_files, CategoryFilter, Database, FileRepository, FileStorage, FileUpdate, KeyValueStore,
    MemoryKvStore, SeedData, SqliteKvStore,
};

use cli::CliArgs;

const HELP: &str = "\
Komutlar:
  /files               tüm dosyaları listele
  /categories [id]     kategorileri veya bir kategorinin dosyalarını göster
  /search <metin>      ad, kategori veya türde ara
  /open <id>           dosyayı seç ve ayrıntılarını göster
  /rename <id> <ad>    dosyayı yeniden adlandır
  /star <id>           dosyanın yıldızını değiştir
  /delete <id>         dosyayı sil
  /clear               sohbeti temizle
  /help                bu yardımı göster
  /quit                çık
Diğer her şey asistana gönderilir.";

/// Render one file the way the display settings ask for.
fn format_file_line(file: &FileRecord, display: &DisplayConfig) -> String {
    let mut line = format!("[{}] {}", file.id, file.name);
    if file.is_starred() {
        line.push_str(" *");
    }
    if display.show_file_size {
        line.push_str(&format!("  {}", format_file_size(file.size)));
    }
    if display.show_file_date {
        line.push_str(&format!("  {}", file.last_modified.format("%Y-%m-%d %H:%M")));
    }
    if display.show_file_path {
        line.push_str(&format!("  {}", file.path));
    }
    line
}

fn format_file_details(file: &FileRecord) -> String {
    let extension = file_extension(&file.name);
    let kind = if extension.is_empty() {
        file.file_type.as_str().to_string()
    } else {
        format!("{} (.{})", file.file_type.as_str(), extension)
    };
    let mut out = format!(
        "  Ad:        {}\n  Tür:       {}\n  Boyut:     {}\n  Tarih:     {}\n  Konum:     {}",
        file.name,
        kind,
        format_file_size(file.size),
        file.last_modified.format("%Y-%m-%d %H:%M"),
        file.path
    );
    if let Some(ref category) = file.category {
        out.push_str(&format!("\n  Kategori:  {}", category));
    }
    let starred = if file.is_starred() { "evet" } else { "hayır" };
    out.push_str(&format!("\n  Yıldızlı:  {}", starred));
    out
}

fn print_message(message: &Message, display: &DisplayConfig) {
    let who = match message.sender {
        Sender::User => "siz",
        Sender::Assistant => "asistan",
    };
    println!("{}> {}", who, message.text);
    if let Some(ref files) = message.related_files {
        for file in files {
            println!("    {}", format_file_line(file, display));
        }
    }
}

/// Prints timeline entries that have not been shown yet.
struct TimelinePrinter {
    shown: usize,
    display: DisplayConfig,
}

impl TimelinePrinter {
    fn flush(&mut self, chat: &ChatOrchestrator) {
        let messages = chat.messages();
        if messages.len() < self.shown {
            self.shown = 0;
        }
        for message in messages.iter().skip(self.shown) {
            if message.sender == Sender::User || message.is_loading {
                continue;
            }
            print_message(message, &self.display);
        }
        self.shown = messages.len();
    }
}

/// The stored collection wins over the seed; an unreadable one is ignored.
fn load_repository(args: &CliArgs, config: &FilepalConfig, files: &FileStorage) -> FileRepository {
    match files.load() {
        Ok(Some(snapshot)) => {
            tracing::info!(files = snapshot.files.len(), "Restored stored file collection");
            return snapshot.into_repository();
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Stored file collection unreadable; using seed"),
    }

    let seed = match args.resolve_seed_path(config.files.seed_path.as_deref()) {
        Some(path) => SeedData::from_path(&path).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Seed unreadable; using built-in files"
            );
            seed::builtin_seed()
        }),
        None => seed::builtin_seed(),
    };
    seed.into_repository()
}

fn open_store(
    args: &CliArgs,
    config: &FilepalConfig,
) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    if args.in_memory {
        tracing::info!("State kept in memory only");
        return Ok(Arc::new(MemoryKvStore::new()));
    }
    let db_path = args
        .resolve_data_dir(&config.general.data_dir)
        .join("filepal.db");
    let db = Database::open(&db_path).map_err(|e| {
        tracing::error!(path = %db_path.display(), error = %e, "Failed to open state database");
        e
    })?;
    Ok(Arc::new(SqliteKvStore::new(Arc::new(db))))
}

fn persist(repo: &FileRepository, files: &FileStorage) {
    if let Err(e) = files.save(repo) {
        tracing::warn!(error = %e, "Failed to save file changes");
    }
}

/// Handle a slash command. Returns false when the shell should exit.
///
/// Commands that change the collection or the selection save it afterwards.
fn run_command(
    line: &str,
    chat: &ChatOrchestrator,
    files: &FileStorage,
    printer: &mut TimelinePrinter,
) -> bool {
    let repo = chat.repository();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let arg = Some(rest).filter(|r| !r.is_empty());

    match (command, arg) {
        ("/quit" | "/exit", _) => return false,
        ("/help", _) => println!("{}", HELP),
        ("/clear", _) => match chat.clear_messages() {
            Ok(()) => {
                printer.shown = 0;
                printer.flush(chat);
            }
            Err(e) => tracing::error!(error = %e, "Failed to clear chat"),
        },
        ("/files", _) => {
            let mut listed = repo.list();
            sort_files(
                &mut listed,
                printer.display.sort_by,
                printer.display.sort_direction,
            );
            for file in &listed {
                println!("  {}", format_file_line(file, &printer.display));
            }
            println!("{} dosya", listed.len());
        }
        ("/categories", None) => {
            for view in repo.categories() {
                println!(
                    "  {:<12} {:<14} {}",
                    view.category.id, view.category.name, view.count
                );
            }
        }
        ("/categories", Some(id)) => {
            let mut listed = repo.files_in_category(&CategoryFilter::from(id));
            sort_files(
                &mut listed,
                printer.display.sort_by,
                printer.display.sort_direction,
            );
            for file in &listed {
                println!("  {}", format_file_line(file, &printer.display));
            }
            println!("{} dosya", listed.len());
        }
        ("/search", Some(text)) => {
            let found = repo.search(text);
            for file in &found {
                println!("  {}", format_file_line(file, &printer.display));
            }
            println!("{} dosya", found.len());
        }
        ("/open", Some(id)) => {
            if repo.select(id) {
                if let Some(file) = repo.selected() {
                    println!("{}", format_file_details(&file));
                }
                persist(&repo, files);
            } else {
                println!("{} bulunamadı", id);
            }
        }
        ("/rename", Some(args)) => match args.split_once(char::is_whitespace) {
            Some((id, name)) => {
                let update = FileUpdate {
                    name: Some(name.trim().to_string()),
                    ..FileUpdate::default()
                };
                match repo.update(id, update) {
                    Some(file) => {
                        println!("{} yeniden adlandırıldı: {}", id, file.name);
                        persist(&repo, files);
                    }
                    None => println!("{} bulunamadı", id),
                }
            }
            None => println!("Kullanım: /rename <id> <yeni ad>"),
        },
        ("/star", Some(id)) => match repo.toggle_starred(id) {
            Some(starred) => {
                if starred {
                    println!("{} yıldızlandı", id);
                } else {
                    println!("{} yıldızı kaldırıldı", id);
                }
                persist(&repo, files);
            }
            None => println!("{} bulunamadı", id),
        },
        ("/delete", Some(id)) => match repo.delete(id) {
            Some(file) => {
                println!("{} silindi", file.name);
                persist(&repo, files);
            }
            None => println!("{} bulunamadı", id),
        },
        _ => println!("Bilinmeyen komut. /help yazın."),
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = FilepalConfig::load_or_default(&config_file);

    // Tracing. Logs go to stderr so they never interleave with the chat.
    let log_filter =
        args.resolve_log_filter(std::env::var("RUST_LOG").ok(), &config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Filepal v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // State.
    let store = open_store(&args, &config)?;
    let files = FileStorage::new(Arc::clone(&store));
    let chat_storage = ChatStorage::new(Arc::clone(&store));
    if args.reset {
        if let Err(e) = files.erase() {
            tracing::warn!(error = %e, "Could not erase stored files");
        }
        if let Err(e) = chat_storage.erase() {
            tracing::warn!(error = %e, "Could not erase stored conversation");
        }
        tracing::info!("Stored state erased");
    }

    // Files.
    let repo = Arc::new(load_repository(&args, &config, &files));
    tracing::info!(files = repo.len(), "File repository ready");

    // Conversation.
    let chat = ChatOrchestrator::builder(Arc::clone(&repo))
        .config(config.chat.clone())
        .resolver(Arc::new(filepal_chat::RuleClassifier::new(
            filepal_chat::ClassifierSettings::from(&config.files),
        )))
        .storage(chat_storage)
        .build();
    if let Err(e) = chat.restore() {
        tracing::warn!(error = %e, "Could not restore previous conversation");
    }

    let mut printer = TimelinePrinter {
        shown: 0,
        display: config.display.clone(),
    };
    printer.flush(&chat);
    println!("(/help ile komutları görebilirsiniz)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.starts_with('/') {
                    if !run_command(line, &chat, &files, &mut printer) {
                        break;
                    }
                    continue;
                }
                match chat.submit(line).await {
                    Ok(_) => {}
                    Err(ChatError::Busy) => {
                        println!("Lütfen önceki isteğin bitmesini bekleyin.")
                    }
                    Err(e) => println!("{}", e),
                }
                printer.flush(&chat);
            }
            _ = ticker.tick() => printer.flush(&chat),
        }
    }

    tracing::info!("Filepal shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filepal_core::types::FileType;

    fn file() -> FileRecord {
        FileRecord::new(
            "7",
            "rapor.pdf",
            FileType::Document,
            1536,
            chrono::Utc::now(),
            "/Documents/rapor.pdf",
        )
        .with_starred(true)
    }

    #[test]
    fn test_format_file_line_respects_display() {
        let display = DisplayConfig {
            show_file_date: false,
            show_file_path: true,
            ..DisplayConfig::default()
        };
        assert_eq!(
            format_file_line(&file(), &display),
            "[7] rapor.pdf *  1.5 KB  /Documents/rapor.pdf"
        );
    }

    #[test]
    fn test_format_file_line_minimal() {
        let display = DisplayConfig {
            show_file_size: false,
            show_file_date: false,
            show_file_path: false,
            ..DisplayConfig::default()
        };
        assert_eq!(format_file_line(&file(), &display), "[7] rapor.pdf *");
    }

    fn shell() -> (Arc<FileRepository>, ChatOrchestrator, FileStorage, TimelinePrinter) {
        let repo = Arc::new(seed::builtin_seed().into_repository());
        let chat = ChatOrchestrator::new(Arc::clone(&repo), Default::default());
        let files = FileStorage::new(Arc::new(MemoryKvStore::new()));
        let printer = TimelinePrinter {
            shown: 0,
            display: DisplayConfig::default(),
        };
        (repo, chat, files, printer)
    }

    #[test]
    fn test_format_file_details() {
        let details = format_file_details(&file().with_category("Work"));
        assert!(details.contains("Ad:        rapor.pdf"));
        assert!(details.contains("Tür:       document (.pdf)"));
        assert!(details.contains("Boyut:     1.5 KB"));
        assert!(details.contains("Kategori:  Work"));
        assert!(details.ends_with("Yıldızlı:  evet"));
    }

    #[tokio::test]
    async fn test_commands_mutate_and_save_repository() {
        let (repo, chat, files, mut printer) = shell();

        assert!(run_command("/star 2", &chat, &files, &mut printer));
        assert_eq!(repo.by_id("2").map(|f| f.is_starred()), Some(true));
        let saved = files.load().unwrap().unwrap();
        assert_eq!(saved.files.iter().find(|f| f.id == "2").unwrap().starred, Some(true));

        assert!(run_command("/delete 2", &chat, &files, &mut printer));
        assert!(repo.by_id("2").is_none());
        assert_eq!(files.load().unwrap().unwrap().files.len(), 14);

        assert!(run_command("/bogus", &chat, &files, &mut printer));
        assert!(!run_command("/quit", &chat, &files, &mut printer));
    }

    #[tokio::test]
    async fn test_open_rename_and_search() {
        let (repo, chat, files, mut printer) = shell();

        assert!(run_command("/open 6", &chat, &files, &mut printer));
        assert_eq!(repo.selected().map(|f| f.id), Some("6".to_string()));
        assert_eq!(
            files.load().unwrap().unwrap().selected_file.as_deref(),
            Some("6")
        );

        assert!(run_command("/rename 7 yillik butce.xlsx", &chat, &files, &mut printer));
        assert_eq!(
            repo.by_id("7").map(|f| f.name),
            Some("yillik butce.xlsx".to_string())
        );
        assert!(run_command("/search yillik", &chat, &files, &mut printer));
        assert_eq!(repo.search("yillik").len(), 1);

        // Deleting the open file clears the stored selection too.
        assert!(run_command("/delete 6", &chat, &files, &mut printer));
        assert!(repo.selected().is_none());
        assert!(files.load().unwrap().unwrap().selected_file.is_none());
    }

    #[tokio::test]
    async fn test_unknown_ids_leave_state_unsaved() {
        let (_repo, chat, files, mut printer) = shell();
        assert!(run_command("/open 99", &chat, &files, &mut printer));
        assert!(run_command("/rename 99 x.txt", &chat, &files, &mut printer));
        assert!(run_command("/star 99", &chat, &files, &mut printer));
        assert!(run_command("/rename 7", &chat, &files, &mut printer));
        assert!(files.load().unwrap().is_none());
    }

    #[test]
    fn test_load_repository_prefers_stored_collection() {
        let args = CliArgs::try_parse_from(["filepal"]).unwrap();
        let config = FilepalConfig::default();
        let files = FileStorage::new(Arc::new(MemoryKvStore::new()));
        assert_eq!(load_repository(&args, &config, &files).len(), 15);

        let stored = seed::builtin_seed().into_repository();
        stored.delete("1");
        files.save(&stored).unwrap();
        let repo = load_repository(&args, &config, &files);
        assert_eq!(repo.len(), 14);
        assert!(repo.by_id("1").is_none());
    }
}
