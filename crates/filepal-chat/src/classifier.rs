//! Keyword intent classifier.
//!
//! Maps a free-text query onto an [`Intent`] by walking a fixed, ordered
//! rule table (first match wins), then resolves the intent against the
//! file repository into response text, matching files and an optional
//! action payload.
//!
//! Matching is plain substring search on the lowercased query, so short
//! tokens such as `son` also fire inside longer words.

use filepal_action::{
    ActionPayload, AnalyzeStoragePayload, BackupPayload, CollageLayout, CollagePayload,
    CompressPayload, EditPhotoPayload, JunkCleanerPayload,
};
use filepal_core::config::FilesConfig;
use filepal_core::types::{FileRecord, FileType};
use filepal_storage::{FileQuery, FileRepository, TextMatch};

use crate::error::ChatError;

// =============================================================================
// Intents
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollageSubject {
    Selfie,
    Landscape,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFilter {
    Recent,
    Landscape,
    Selfie,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    Recent,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentScope {
    Work,
    Personal,
    All,
}

/// The classified purpose of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Collage(CollageSubject),
    EditPhoto,
    Photos(PhotoFilter),
    Videos(Recency),
    Documents(DocumentScope),
    Audio,
    Archives,
    Starred,
    Work,
    Vacation,
    AllFiles,
    Recent,
    Largest,
    Storage,
    Cleanup,
    Categories,
    Help,
    Analyze,
    Compress,
    Backup,
    /// Fallback free-text search over the original query.
    Search(String),
}

impl Intent {
    /// 1-based position of the rule that produced this intent.
    pub fn rule_index(&self) -> usize {
        match self {
            Intent::Greeting => 1,
            Intent::Collage(_) => 2,
            Intent::EditPhoto => 3,
            Intent::Photos(_) => 4,
            Intent::Videos(_) => 5,
            Intent::Documents(_) => 6,
            Intent::Audio => 7,
            Intent::Archives => 8,
            Intent::Starred => 9,
            Intent::Work => 10,
            Intent::Vacation => 11,
            Intent::AllFiles => 12,
            Intent::Recent => 13,
            Intent::Largest => 14,
            Intent::Storage => 15,
            Intent::Cleanup => 16,
            Intent::Categories => 17,
            Intent::Help => 18,
            Intent::Analyze => 19,
            Intent::Compress => 20,
            Intent::Backup => 21,
            Intent::Search(_) => 22,
        }
    }
}

// =============================================================================
// Rule table
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Greeting,
    Collage,
    EditPhoto,
    Photos,
    Videos,
    Documents,
    Audio,
    Archives,
    Starred,
    Work,
    Vacation,
    AllFiles,
    Recent,
    Largest,
    Storage,
    Cleanup,
    Categories,
    Help,
    Analyze,
    Compress,
    Backup,
}

/// Trigger tokens in precedence order. Anything unmatched is a search.
const RULES: [(Rule, &[&str]); 21] = [
    (Rule::Greeting, &["merhaba", "selam", "nasıl"]),
    (Rule::Collage, &["kolaj", "collage"]),
    (Rule::EditPhoto, &["düzenle", "edit", "filtre"]),
    (Rule::Photos, &["fotoğraf", "resim", "foto"]),
    (Rule::Videos, &["video"]),
    (Rule::Documents, &["belge", "doküman", "dosya"]),
    (Rule::Audio, &["müzik", "ses", "audio"]),
    (Rule::Archives, &["arşiv", "zip"]),
    (Rule::Starred, &["yıldız", "favori"]),
    (Rule::Work, &["iş", "çalışma"]),
    (Rule::Vacation, &["tatil", "gezi"]),
    (Rule::AllFiles, &["tüm", "bütün", "hepsi"]),
    (Rule::Recent, &["son", "yeni"]),
    (Rule::Largest, &["büyük"]),
    (Rule::Storage, &["ssd", "depolama"]),
    (Rule::Cleanup, &["temizle", "junk", "çöp"]),
    (Rule::Categories, &["kategori"]),
    (Rule::Help, &["yardım", "ne yapabilir"]),
    (Rule::Analyze, &["analiz"]),
    (Rule::Compress, &["sıkıştır", "compress"]),
    (Rule::Backup, &["yedekle", "backup"]),
];

const RECENT: &[&str] = &["son", "yeni"];
const COLLAGE_SELFIE: &[&str] = &["selfi", "selfie", "özçekim"];
const COLLAGE_LANDSCAPE: &[&str] = &["manzara", "landscape"];
const PHOTO_LANDSCAPE: &[&str] = &["manzara"];
const PHOTO_SELFIE: &[&str] = &["selfie", "özçekim", "portre"];
const DOC_WORK: &[&str] = &["iş", "work"];
const DOC_PERSONAL: &[&str] = &["kişisel", "personal"];

fn contains_any(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| haystack.contains(t))
}

/// Classify a query. Pure: depends only on the text.
pub fn detect(query: &str) -> Intent {
    let q = query.to_lowercase();

    let Some(rule) = RULES
        .iter()
        .find(|(_, tokens)| contains_any(&q, tokens))
        .map(|(rule, _)| *rule)
    else {
        return Intent::Search(query.to_string());
    };

    match rule {
        Rule::Greeting => Intent::Greeting,
        Rule::Collage => Intent::Collage(if contains_any(&q, COLLAGE_SELFIE) {
            CollageSubject::Selfie
        } else if contains_any(&q, COLLAGE_LANDSCAPE) {
            CollageSubject::Landscape
        } else {
            CollageSubject::Any
        }),
        Rule::EditPhoto => Intent::EditPhoto,
        Rule::Photos => Intent::Photos(if contains_any(&q, RECENT) {
            PhotoFilter::Recent
        } else if contains_any(&q, PHOTO_LANDSCAPE) {
            PhotoFilter::Landscape
        } else if contains_any(&q, PHOTO_SELFIE) {
            PhotoFilter::Selfie
        } else {
            PhotoFilter::All
        }),
        Rule::Videos => Intent::Videos(if contains_any(&q, RECENT) {
            Recency::Recent
        } else {
            Recency::All
        }),
        Rule::Documents => Intent::Documents(if contains_any(&q, DOC_WORK) {
            DocumentScope::Work
        } else if contains_any(&q, DOC_PERSONAL) {
            DocumentScope::Personal
        } else {
            DocumentScope::All
        }),
        Rule::Audio => Intent::Audio,
        Rule::Archives => Intent::Archives,
        Rule::Starred => Intent::Starred,
        Rule::Work => Intent::Work,
        Rule::Vacation => Intent::Vacation,
        Rule::AllFiles => Intent::AllFiles,
        Rule::Recent => Intent::Recent,
        Rule::Largest => Intent::Largest,
        Rule::Storage => Intent::Storage,
        Rule::Cleanup => Intent::Cleanup,
        Rule::Categories => Intent::Categories,
        Rule::Help => Intent::Help,
        Rule::Analyze => Intent::Analyze,
        Rule::Compress => Intent::Compress,
        Rule::Backup => Intent::Backup,
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Everything the conversation needs from one classified query.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub intent: Intent,
    pub response_text: String,
    pub files: Vec<FileRecord>,
    pub action: Option<ActionPayload>,
}

impl Resolution {
    fn text(intent: Intent, response_text: impl Into<String>) -> Self {
        Self {
            intent,
            response_text: response_text.into(),
            files: Vec::new(),
            action: None,
        }
    }

    fn with_files(mut self, files: Vec<FileRecord>) -> Self {
        self.files = files;
        self
    }

    fn with_action(mut self, action: ActionPayload) -> Self {
        self.action = Some(action);
        self
    }
}

/// Something that can turn a query into a [`Resolution`].
pub trait IntentResolver: Send + Sync {
    fn resolve(&self, query: &str, repo: &FileRepository) -> Result<Resolution, ChatError>;
}

/// Thresholds used when resolving intents.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    /// Files strictly larger than this are compression candidates.
    pub large_file_threshold_bytes: u64,
    pub compress_limit: usize,
    pub recent_limit: usize,
    pub largest_limit: usize,
    pub recent_photo_limit: usize,
    pub recent_video_limit: usize,
    pub collage_limit: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            large_file_threshold_bytes: 5_000_000,
            compress_limit: 3,
            recent_limit: 5,
            largest_limit: 5,
            recent_photo_limit: 5,
            recent_video_limit: 3,
            collage_limit: 4,
        }
    }
}

impl From<&FilesConfig> for ClassifierSettings {
    fn from(config: &FilesConfig) -> Self {
        Self {
            large_file_threshold_bytes: config.large_file_threshold_bytes,
            recent_limit: config.recent_limit,
            largest_limit: config.largest_limit,
            ..Self::default()
        }
    }
}

/// The ordered keyword classifier.
#[derive(Debug, Clone, Default)]
pub struct RuleClassifier {
    settings: ClassifierSettings,
}

impl RuleClassifier {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    /// Detect and resolve in one step.
    pub fn classify(&self, query: &str, repo: &FileRepository) -> Resolution {
        self.resolve_intent(detect(query), repo)
    }

    /// Resolve an already detected intent against the repository.
    pub fn resolve_intent(&self, intent: Intent, repo: &FileRepository) -> Resolution {
        let s = &self.settings;
        let images = || FileQuery::new().of_type(FileType::Image);
        let selfies = || images().any_of([TextMatch::name("selfie"), TextMatch::name("portrait")]);
        let landscapes =
            || images().any_of([TextMatch::name("landscape"), TextMatch::path("landscape")]);

        match intent {
            Intent::Greeting => Resolution::text(
                intent,
                "Merhaba! Size nasıl yardımcı olabilirim? Dosyalarınızı bulmak, kategorize etmek veya yönetmek için bana sorabilirsiniz.",
            ),

            Intent::Collage(subject) => {
                let (query, layout, title) = match subject {
                    CollageSubject::Selfie => (selfies(), CollageLayout::Grid, "Instagram Kolajı"),
                    CollageSubject::Landscape => {
                        (landscapes(), CollageLayout::Panorama, "Manzara Kolajı")
                    }
                    CollageSubject::Any => (
                        images().limit(s.collage_limit),
                        CollageLayout::Grid,
                        "Fotoğraf Kolajı",
                    ),
                };
                let files = repo.filter(&query);

                if files.is_empty() {
                    let text = match subject {
                        CollageSubject::Selfie => "Maalesef selfie olarak etiketlenmiş fotoğraf bulamadım. Başka bir fotoğraf türü ile kolaj oluşturmak ister misiniz?",
                        CollageSubject::Landscape => "Maalesef manzara olarak etiketlenmiş fotoğraf bulamadım. Başka bir fotoğraf türü ile kolaj oluşturmak ister misiniz?",
                        CollageSubject::Any => "Kolaj oluşturmak için fotoğraf bulamadım. Lütfen önce bazı fotoğraflar yükleyin.",
                    };
                    return Resolution::text(intent, text);
                }

                let text = match subject {
                    CollageSubject::Selfie => format!(
                        "{} adet selfie buldum. Bunlardan bir kolaj oluşturuyorum...",
                        files.len()
                    ),
                    CollageSubject::Landscape => format!(
                        "{} adet manzara fotoğrafı buldum. Bunlardan bir kolaj oluşturuyorum...",
                        files.len()
                    ),
                    CollageSubject::Any => format!(
                        "{} adet fotoğraf seçtim. Bunlardan bir kolaj oluşturuyorum...",
                        files.len()
                    ),
                };
                let action = ActionPayload::CreateCollage(CollagePayload {
                    images: files.clone(),
                    layout,
                    title: title.to_string(),
                });
                Resolution::text(intent, text)
                    .with_files(files)
                    .with_action(action)
            }

            Intent::EditPhoto => match repo.filter(&images().limit(1)).into_iter().next() {
                Some(image) => Resolution::text(
                    intent,
                    "Bu fotoğrafı düzenlemek için hangi filtreyi uygulamak istersiniz? Siyah-beyaz, vintage, parlak veya kontrast filtreleri mevcut.",
                )
                .with_files(vec![image.clone()])
                .with_action(ActionPayload::EditPhoto(EditPhotoPayload::for_image(image))),
                None => Resolution::text(
                    intent,
                    "Düzenlemek için fotoğraf bulamadım. Lütfen önce bir fotoğraf yükleyin.",
                ),
            },

            Intent::Photos(filter) => {
                let (files, text) = match filter {
                    PhotoFilter::Recent => (
                        repo.filter(&images().newest_first().limit(s.recent_photo_limit)),
                        format!("En son eklenen {} fotoğrafınız:", s.recent_photo_limit),
                    ),
                    PhotoFilter::Landscape => {
                        let files = repo.filter(&landscapes());
                        let text = if files.is_empty() {
                            "Manzara fotoğrafı bulamadım. Farklı bir arama yapmak ister misiniz?"
                                .to_string()
                        } else {
                            format!("{} adet manzara fotoğrafı buldum.", files.len())
                        };
                        (files, text)
                    }
                    PhotoFilter::Selfie => {
                        let files = repo.filter(&selfies());
                        let text = if files.is_empty() {
                            "Selfie veya portre fotoğrafı bulamadım. Farklı bir arama yapmak ister misiniz?"
                                .to_string()
                        } else {
                            format!("{} adet selfie/portre fotoğrafı buldum.", files.len())
                        };
                        (files, text)
                    }
                    PhotoFilter::All => {
                        let files = repo.filter(&images());
                        let text = format!("{} fotoğraf buldum. İşte sonuçlar:", files.len());
                        (files, text)
                    }
                };
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Videos(recency) => {
                let videos = FileQuery::new().of_type(FileType::Video);
                let (files, text) = match recency {
                    Recency::Recent => (
                        repo.filter(&videos.newest_first().limit(s.recent_video_limit)),
                        format!("En son eklenen {} videonuz:", s.recent_video_limit),
                    ),
                    Recency::All => {
                        let files = repo.filter(&videos);
                        let text = format!("{} video buldum. İşte sonuçlar:", files.len());
                        (files, text)
                    }
                };
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Documents(scope) => {
                let docs = FileQuery::new().of_type(FileType::Document);
                let (files, label) = match scope {
                    DocumentScope::Work => (
                        repo.filter(
                            &docs.any_of([TextMatch::category("Work"), TextMatch::path("work")]),
                        ),
                        "iş belgesi",
                    ),
                    DocumentScope::Personal => (
                        repo.filter(&docs.any_of([
                            TextMatch::category("Personal"),
                            TextMatch::path("personal"),
                        ])),
                        "kişisel belge",
                    ),
                    DocumentScope::All => (repo.filter(&docs), "belge"),
                };
                let text = format!("{} {} buldum. İşte sonuçlar:", files.len(), label);
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Audio => {
                let files = repo.filter(&FileQuery::new().of_type(FileType::Audio));
                let text = format!("{} ses dosyası buldum. İşte sonuçlar:", files.len());
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Archives => {
                let files = repo.filter(&FileQuery::new().of_type(FileType::Archive));
                let text = format!("{} arşiv dosyası buldum. İşte sonuçlar:", files.len());
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Starred => {
                let files = repo.filter(&FileQuery::new().starred(true));
                let text = format!("{} yıldızlı dosya buldum. İşte sonuçlar:", files.len());
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Work => {
                let files = repo.filter(&FileQuery::new().in_category("Work"));
                let text = format!("{} iş dosyası buldum. İşte sonuçlar:", files.len());
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Vacation => {
                let files = repo.filter(
                    &FileQuery::new()
                        .any_of([TextMatch::name("vacation"), TextMatch::category("Travel")]),
                );
                let text = format!(
                    "{} tatil ile ilgili dosya buldum. İşte sonuçlar:",
                    files.len()
                );
                Resolution::text(intent, text).with_files(files)
            }

            Intent::AllFiles => {
                let files = repo.list();
                let text = format!(
                    "Toplam {} dosya bulunuyor. İşte tüm dosyalarınız:",
                    files.len()
                );
                Resolution::text(intent, text).with_files(files)
            }

            Intent::Recent => {
                let text = format!("En son değiştirilen {} dosyanız:", s.recent_limit);
                Resolution::text(intent, text).with_files(repo.recent(s.recent_limit))
            }

            Intent::Largest => {
                let text = format!("En büyük {} dosyanız:", s.largest_limit);
                Resolution::text(intent, text).with_files(repo.largest(s.largest_limit))
            }

            Intent::Storage => Resolution::text(
                intent,
                "Telefonunuzda 8.76 GB kullanılmış durumda, toplam 53.65 GB depolama alanınız var. Yaklaşık %16 kullanım oranı ile depolama alanınız iyi durumda.",
            ),

            Intent::Cleanup => Resolution::text(
                intent,
                "Gereksiz dosyaları taramak için Junk Cleaner özelliğini kullanabilirsiniz. Ana ekranda bulunan Junk Cleaner butonuna tıklayarak tarama başlatabilirsiniz.",
            )
            .with_action(ActionPayload::JunkCleaner(JunkCleanerPayload::default())),

            Intent::Categories => Resolution::text(
                intent,
                "Dosyalarınız şu kategorilere ayrılmış durumda: Fotoğraflar, Videolar, Müzik, Belgeler, İndirilenler ve APK dosyaları. Kategoriler sekmesinden tüm kategorileri görüntüleyebilirsiniz.",
            ),

            Intent::Help => Resolution::text(
                intent,
                "Size dosyalarınızı bulmak, kategorize etmek ve yönetmek konusunda yardımcı olabilirim. Örneğin 'fotoğraflarımı göster', 'en son belgelerimi bul', 'büyük dosyaları listele' gibi komutlar verebilirsiniz. Ayrıca 'selfie'lerimden kolaj yap' veya 'bu fotoğrafı düzenle' gibi daha karmaşık istekleri de yerine getirebilirim.",
            ),

            Intent::Analyze => Resolution::text(
                intent,
                "Dosyalarınızı analiz ediyorum... Toplam 15 dosyanız var: 3 fotoğraf, 2 video, 5 belge, 2 ses dosyası ve 3 arşiv. En çok yer kaplayan dosya türü videolar (337 MB). Son 30 günde en çok belge türünde dosya eklemişsiniz.",
            )
            .with_action(ActionPayload::AnalyzeStorage(AnalyzeStoragePayload::default())),

            Intent::Compress => {
                let files = repo.filter(
                    &FileQuery::new()
                        .larger_than(s.large_file_threshold_bytes)
                        .limit(s.compress_limit),
                );
                if files.is_empty() {
                    return Resolution::text(
                        intent,
                        "Sıkıştırmak için uygun dosya bulamadım. Lütfen sıkıştırmak istediğiniz dosyaları belirtin.",
                    );
                }
                let text = format!(
                    "{} dosyayı sıkıştırıyorum. Bu işlem dosya boyutlarını yaklaşık %40 oranında azaltacak.",
                    files.len()
                );
                let action = ActionPayload::CompressFiles(CompressPayload::zip(files.clone()));
                Resolution::text(intent, text)
                    .with_files(files)
                    .with_action(action)
            }

            Intent::Backup => Resolution::text(
                intent,
                "Dosyalarınızı yedekleme işlemi başlatılıyor. Toplam 15 dosya (1.2 GB) bulut depolama alanınıza yedeklenecek. Bu işlem internet bağlantınıza bağlı olarak yaklaşık 10 dakika sürebilir.",
            )
            .with_action(ActionPayload::BackupFiles(BackupPayload::default())),

            Intent::Search(ref query) => {
                let needle = query.to_lowercase();
                let files = repo.filter(&FileQuery::new().any_of([
                    TextMatch::name(&needle),
                    TextMatch::category_contains(&needle),
                ]));
                let text = if files.is_empty() {
                    format!(
                        "\"{}\" için sonuç bulamadım. Farklı bir arama yapmak ister misiniz?",
                        query
                    )
                } else {
                    format!("\"{}\" aramanız için {} sonuç buldum:", query, files.len())
                };
                Resolution::text(Intent::Search(query.clone()), text).with_files(files)
            }
        }
    }
}

impl IntentResolver for RuleClassifier {
    fn resolve(&self, query: &str, repo: &FileRepository) -> Result<Resolution, ChatError> {
        Ok(self.classify(query, repo))
    }
}

/// Classify with default thresholds.
pub fn classify(query: &str, repo: &FileRepository) -> Resolution {
    RuleClassifier::default().classify(query, repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use filepal_action::ActionKind;

    fn file(id: &str, name: &str, t: FileType, size: u64, day: u32, path: &str) -> FileRecord {
        FileRecord::new(
            id,
            name,
            t,
            size,
            Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
            path,
        )
    }

    fn repo() -> FileRepository {
        FileRepository::with_seed(
            vec![
                file(
                    "1",
                    "selfie_beach.jpg",
                    FileType::Image,
                    2_100_000,
                    10,
                    "/DCIM/selfie_beach.jpg",
                )
                .with_starred(true),
                file(
                    "2",
                    "portrait_mom.jpg",
                    FileType::Image,
                    1_800_000,
                    12,
                    "/DCIM/portrait_mom.jpg",
                ),
                file("3", "alps.jpg", FileType::Image, 4_000_000, 2, "/Pictures/landscape/alps.jpg")
                    .with_category("Travel"),
                file("4", "birthday.mp4", FileType::Video, 120_000_000, 5, "/Movies/birthday.mp4"),
                file(
                    "5",
                    "vacation_clip.mp4",
                    FileType::Video,
                    220_000_000,
                    14,
                    "/Movies/vacation_clip.mp4",
                )
                .with_category("Travel"),
                file(
                    "6",
                    "Q2_report.pdf",
                    FileType::Document,
                    800_000,
                    20,
                    "/Documents/Work/Q2_report.pdf",
                )
                .with_category("Work"),
                file(
                    "7",
                    "passport.pdf",
                    FileType::Document,
                    300_000,
                    1,
                    "/Documents/personal/passport.pdf",
                ),
                file("8", "song.mp3", FileType::Audio, 6_000_000, 3, "/Music/song.mp3")
                    .with_starred(true),
                file("9", "photos.zip", FileType::Archive, 40_000_000, 8, "/Download/photos.zip")
                    .with_category("Downloads"),
            ],
            vec![],
        )
    }

    fn ids(files: &[FileRecord]) -> Vec<&str> {
        files.iter().map(|f| f.id.as_str()).collect()
    }

    // ---- detection ----

    #[test]
    fn test_each_rule_beats_every_later_rule() {
        for (k, (_, tokens)) in RULES.iter().enumerate() {
            let query: Vec<&str> = std::iter::once(tokens[0])
                .chain(RULES[k + 1..].iter().map(|(_, t)| t[0]))
                .collect();
            let query = query.join(" ");
            assert_eq!(detect(&query).rule_index(), k + 1, "query: {}", query);
        }
    }

    #[test]
    fn test_every_token_triggers_its_rule() {
        for (k, (_, tokens)) in RULES.iter().enumerate() {
            for token in tokens.iter() {
                let intent = detect(token);
                assert!(
                    intent.rule_index() <= k + 1,
                    "token {} resolved to rule {}",
                    token,
                    intent.rule_index()
                );
            }
        }
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        assert_eq!(detect("MERHABA"), Intent::Greeting);
        assert_eq!(detect("Video"), Intent::Videos(Recency::All));
    }

    #[test]
    fn test_substring_matching_fires_inside_words() {
        // "sonra" contains "son"
        assert_eq!(detect("sonra bakarız"), Intent::Recent);
    }

    #[test]
    fn test_collage_subjects() {
        assert_eq!(detect("selfie kolaj yap"), Intent::Collage(CollageSubject::Selfie));
        assert_eq!(detect("özçekim kolajı"), Intent::Collage(CollageSubject::Selfie));
        assert_eq!(detect("landscape collage"), Intent::Collage(CollageSubject::Landscape));
        assert_eq!(detect("kolaj yap"), Intent::Collage(CollageSubject::Any));
    }

    #[test]
    fn test_photo_filters() {
        assert_eq!(detect("son fotoğraflar"), Intent::Photos(PhotoFilter::Recent));
        assert_eq!(detect("manzara resimleri"), Intent::Photos(PhotoFilter::Landscape));
        assert_eq!(detect("portre fotoları"), Intent::Photos(PhotoFilter::Selfie));
        assert_eq!(detect("fotoğraflarımı göster"), Intent::Photos(PhotoFilter::All));
    }

    #[test]
    fn test_document_scopes() {
        assert_eq!(detect("iş belgeleri"), Intent::Documents(DocumentScope::Work));
        assert_eq!(detect("personal docs dosya"), Intent::Documents(DocumentScope::Personal));
        assert_eq!(detect("belgeler"), Intent::Documents(DocumentScope::All));
    }

    #[test]
    fn test_unmatched_is_search_with_original_text() {
        assert_eq!(detect("Beach"), Intent::Search("Beach".to_string()));
        assert_eq!(detect("Beach").rule_index(), 22);
    }

    // ---- resolution ----

    #[test]
    fn test_selfie_collage_builds_action() {
        let r = classify("selfie kolaj yap", &repo());
        assert_eq!(ids(&r.files), vec!["1", "2"]);
        assert_eq!(r.response_text, "2 adet selfie buldum. Bunlardan bir kolaj oluşturuyorum...");
        match r.action {
            Some(ActionPayload::CreateCollage(ref c)) => {
                assert_eq!(c.images.len(), 2);
                assert_eq!(c.layout, CollageLayout::Grid);
                assert_eq!(c.title, "Instagram Kolajı");
            }
            ref other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_landscape_collage_matches_path() {
        let r = classify("manzara kolajı", &repo());
        assert_eq!(ids(&r.files), vec!["3"]);
        match r.action {
            Some(ActionPayload::CreateCollage(ref c)) => {
                assert_eq!(c.layout, CollageLayout::Panorama);
                assert_eq!(c.title, "Manzara Kolajı");
            }
            ref other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_generic_collage_takes_first_four_images() {
        let mut files = repo().list();
        for i in 0..3 {
            files.push(file(&format!("x{}", i), "extra.png", FileType::Image, 1, 1, "/x"));
        }
        let repo = FileRepository::with_seed(files, vec![]);
        let r = classify("kolaj", &repo);
        assert_eq!(ids(&r.files), vec!["1", "2", "3", "x0"]);
        assert_eq!(r.action.as_ref().map(|a| a.kind()), Some(ActionKind::CreateCollage));
    }

    #[test]
    fn test_collage_without_matches_has_no_action() {
        let r = classify("selfie kolaj", &FileRepository::new());
        assert!(r.files.is_empty());
        assert!(r.action.is_none());
        assert!(r.response_text.starts_with("Maalesef selfie"));
    }

    #[test]
    fn test_edit_photo_uses_first_image() {
        let r = classify("bunu düzenle", &repo());
        assert_eq!(ids(&r.files), vec!["1"]);
        match r.action {
            Some(ActionPayload::EditPhoto(ref e)) => {
                assert_eq!(e.image.id, "1");
                assert_eq!(e.available_filters.len(), 4);
            }
            ref other => panic!("unexpected action: {:?}", other),
        }
        assert!(classify("edit", &FileRepository::new()).action.is_none());
    }

    #[test]
    fn test_photos_with_no_images_still_answers() {
        let empty = FileRepository::with_seed(
            vec![file("1", "a.pdf", FileType::Document, 1, 1, "/a.pdf")],
            vec![],
        );
        let r = classify("fotoğraflarımı göster", &empty);
        assert!(r.files.is_empty());
        assert_eq!(r.response_text, "0 fotoğraf buldum. İşte sonuçlar:");
        assert!(r.action.is_none());
    }

    #[test]
    fn test_recent_photos_newest_first() {
        let r = classify("son fotoğraflarım", &repo());
        assert_eq!(ids(&r.files), vec!["2", "1", "3"]);
        assert_eq!(r.response_text, "En son eklenen 5 fotoğrafınız:");
    }

    #[test]
    fn test_videos() {
        let r = classify("yeni videolar", &repo());
        assert_eq!(ids(&r.files), vec!["5", "4"]);
        let r = classify("video", &repo());
        assert_eq!(r.response_text, "2 video buldum. İşte sonuçlar:");
    }

    #[test]
    fn test_documents_by_scope() {
        let r = classify("work belgeleri", &repo());
        assert_eq!(ids(&r.files), vec!["6"]);
        assert_eq!(r.response_text, "1 iş belgesi buldum. İşte sonuçlar:");

        let r = classify("personal belgeler", &repo());
        assert_eq!(ids(&r.files), vec!["7"]);

        // "kişisel" contains "iş", so the work scope wins
        assert_eq!(
            detect("kişisel belgeler"),
            Intent::Documents(DocumentScope::Work)
        );

        let r = classify("dosyalar", &repo());
        assert_eq!(r.files.len(), 2);
    }

    #[test]
    fn test_type_and_flag_lists() {
        assert_eq!(ids(&classify("müzik", &repo()).files), vec!["8"]);
        assert_eq!(ids(&classify("arşivler", &repo()).files), vec!["9"]);
        assert_eq!(ids(&classify("favorilerim", &repo()).files), vec!["1", "8"]);
        assert_eq!(ids(&classify("çalışma", &repo()).files), vec!["6"]);
        assert_eq!(ids(&classify("tatil", &repo()).files), vec!["3", "5"]);
        assert_eq!(classify("hepsi", &repo()).files.len(), 9);
    }

    #[test]
    fn test_recent_and_largest() {
        let r = classify("yeni", &repo());
        assert_eq!(ids(&r.files), vec!["6", "5", "2", "1", "9"]);
        assert_eq!(r.response_text, "En son değiştirilen 5 dosyanız:");

        let r = classify("büyük", &repo());
        assert_eq!(ids(&r.files), vec!["5", "4", "9", "8", "3"]);
    }

    #[test]
    fn test_fixed_text_intents_have_no_files() {
        for query in ["ssd", "kategori", "yardım"] {
            let r = classify(query, &repo());
            assert!(r.files.is_empty());
            assert!(r.action.is_none());
            assert!(!r.response_text.is_empty());
        }
    }

    #[test]
    fn test_action_intents() {
        let kind = |q: &str| classify(q, &repo()).action.map(|a| a.kind());
        assert_eq!(kind("çöp temizle"), Some(ActionKind::JunkCleaner));
        assert_eq!(kind("analiz"), Some(ActionKind::AnalyzeStorage));
        assert_eq!(kind("backup"), Some(ActionKind::BackupFiles));
        assert_eq!(kind("compress"), Some(ActionKind::CompressFiles));
    }

    #[test]
    fn test_compress_picks_large_files_up_to_three() {
        let r = classify("compress", &repo());
        assert_eq!(ids(&r.files), vec!["4", "5", "8"]);
        match r.action {
            Some(ActionPayload::CompressFiles(ref c)) => {
                assert_eq!(c.files.len(), 3);
                assert_eq!(c.compression_ratio, 0.4);
                assert_eq!(c.output_format, "zip");
            }
            ref other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_compress_without_large_files() {
        let small = FileRepository::with_seed(
            vec![file("1", "a.txt", FileType::Document, 5_000_000, 1, "/a.txt")],
            vec![],
        );
        let r = classify("compress", &small);
        assert!(r.action.is_none());
        assert!(r.files.is_empty());
        assert!(r.response_text.starts_with("Sıkıştırmak için uygun dosya bulamadım"));
    }

    #[test]
    fn test_search_hits_name_and_category() {
        let r = classify("Beach", &repo());
        assert_eq!(ids(&r.files), vec!["1"]);
        assert_eq!(r.response_text, "\"Beach\" aramanız için 1 sonuç buldum:");

        let r = classify("downl", &repo());
        assert_eq!(ids(&r.files), vec!["9"]);
    }

    #[test]
    fn test_search_miss_is_not_an_error() {
        let r = classify("xyzzy", &repo());
        assert!(r.files.is_empty());
        assert_eq!(
            r.response_text,
            "\"xyzzy\" için sonuç bulamadım. Farklı bir arama yapmak ister misiniz?"
        );
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = FilesConfig::default();
        config.large_file_threshold_bytes = 100_000_000;
        config.recent_limit = 2;
        let classifier = RuleClassifier::new(ClassifierSettings::from(&config));

        let r = classifier.classify("compress", &repo());
        assert_eq!(ids(&r.files), vec!["4", "5"]);
        let r = classifier.classify("yeni", &repo());
        assert_eq!(r.files.len(), 2);
        assert_eq!(r.response_text, "En son değiştirilen 2 dosyanız:");
    }

    #[test]
    fn test_resolver_trait_wraps_classify() {
        let resolver: &dyn IntentResolver = &RuleClassifier::default();
        let r = resolver.resolve("merhaba", &repo()).unwrap();
        assert_eq!(r.intent, Intent::Greeting);
    }
}
