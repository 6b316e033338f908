//! Built-in demo collection used when no seed file is configured.

use chrono::{Duration, Utc};

use filepal_core::types::{Category, FileRecord, FileType};
use filepal_storage::SeedData;

fn category(id: &str, name: &str, icon: &str, color: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
    }
}

/// Fifteen files spread across the phone's usual folders.
pub fn builtin_seed() -> SeedData {
    let now = Utc::now();
    let ago = |hours: i64| now - Duration::hours(hours);

    let files = vec![
        FileRecord::new(
            "1",
            "selfie_istanbul.jpg",
            FileType::Image,
            3_400_000,
            ago(2),
            "/DCIM/Camera/selfie_istanbul.jpg",
        )
        .with_category("Travel")
        .with_starred(true)
        .with_thumbnail("thumbs/1.jpg"),
        FileRecord::new(
            "2",
            "portrait_family.jpg",
            FileType::Image,
            2_800_000,
            ago(30),
            "/DCIM/Camera/portrait_family.jpg",
        )
        .with_thumbnail("thumbs/2.jpg"),
        FileRecord::new(
            "3",
            "landscape_cappadocia.jpg",
            FileType::Image,
            5_600_000,
            ago(72),
            "/DCIM/landscape/cappadocia.jpg",
        )
        .with_category("Travel")
        .with_thumbnail("thumbs/3.jpg"),
        FileRecord::new(
            "4",
            "vacation_antalya.mp4",
            FileType::Video,
            215_000_000,
            ago(48),
            "/Movies/vacation_antalya.mp4",
        )
        .with_category("Travel"),
        FileRecord::new(
            "5",
            "birthday_party.mp4",
            FileType::Video,
            122_000_000,
            ago(240),
            "/Movies/birthday_party.mp4",
        )
        .with_starred(true),
        FileRecord::new(
            "6",
            "proje_raporu.pdf",
            FileType::Document,
            1_900_000,
            ago(5),
            "/Documents/work/proje_raporu.pdf",
        )
        .with_category("Work")
        .with_starred(true),
        FileRecord::new(
            "7",
            "butce_2024.xlsx",
            FileType::Document,
            640_000,
            ago(26),
            "/Documents/work/butce_2024.xlsx",
        )
        .with_category("Work"),
        FileRecord::new(
            "8",
            "sunum.pptx",
            FileType::Document,
            8_300_000,
            ago(96),
            "/Documents/work/sunum.pptx",
        )
        .with_category("Work"),
        FileRecord::new(
            "9",
            "ozgecmis.docx",
            FileType::Document,
            210_000,
            ago(400),
            "/Documents/personal/ozgecmis.docx",
        )
        .with_category("Personal"),
        FileRecord::new(
            "10",
            "kira_sozlesmesi.pdf",
            FileType::Document,
            1_200_000,
            ago(700),
            "/Documents/personal/kira_sozlesmesi.pdf",
        )
        .with_category("Personal"),
        FileRecord::new(
            "11",
            "podcast_bolum_12.mp3",
            FileType::Audio,
            48_000_000,
            ago(12),
            "/Music/podcast_bolum_12.mp3",
        ),
        FileRecord::new(
            "12",
            "sesli_not.m4a",
            FileType::Audio,
            900_000,
            ago(3),
            "/Recordings/sesli_not.m4a",
        ),
        FileRecord::new(
            "13",
            "fotograflar_yedek.zip",
            FileType::Archive,
            310_000_000,
            ago(500),
            "/Download/fotograflar_yedek.zip",
        )
        .with_category("Downloads"),
        FileRecord::new(
            "14",
            "belgeler.rar",
            FileType::Archive,
            24_000_000,
            ago(150),
            "/Download/belgeler.rar",
        )
        .with_category("Downloads"),
        FileRecord::new(
            "15",
            "harita_uygulamasi.apk",
            FileType::Archive,
            36_000_000,
            ago(60),
            "/Download/harita_uygulamasi.apk",
        )
        .with_category("Downloads"),
    ];

    let categories = vec![
        category("photos", "Fotoğraflar", "image", "#F472B6"),
        category("videos", "Videolar", "video", "#A78BFA"),
        category("music", "Müzik", "music", "#34D399"),
        category("documents", "Belgeler", "file-text", "#60A5FA"),
        category("downloads", "İndirilenler", "download", "#FBBF24"),
        category("apk", "APK", "package", "#F87171"),
    ];

    SeedData { files, categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_seed_shape() {
        let seed = builtin_seed();
        assert_eq!(seed.files.len(), 15);
        let ids: HashSet<_> = seed.files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), 15);

        let count = |t: FileType| seed.files.iter().filter(|f| f.file_type == t).count();
        assert_eq!(count(FileType::Image), 3);
        assert_eq!(count(FileType::Video), 2);
        assert_eq!(count(FileType::Document), 5);
        assert_eq!(count(FileType::Audio), 2);
        assert_eq!(count(FileType::Archive), 3);
    }

    #[test]
    fn test_category_counts() {
        let repo = builtin_seed().into_repository();
        let counts: Vec<(String, usize)> = repo
            .categories()
            .into_iter()
            .map(|c| (c.category.id, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("photos".to_string(), 3),
                ("videos".to_string(), 2),
                ("music".to_string(), 2),
                ("documents".to_string(), 5),
                ("downloads".to_string(), 3),
                ("apk".to_string(), 1),
            ]
        );
    }
}
