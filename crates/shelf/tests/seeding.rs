//! First-run seeding from sample documents on disk.

use std::sync::Arc;

use shelf::{Catalog, CatalogConfig, FileSeedSource, SeedLocation, SeedOutcome};
use shelf_core::{fallback_authors, fallback_books};
use shelf_testkit::{all_documents, TestFixture};

#[tokio::test]
async fn every_sample_document_seeds_as_recorded() {
    let dir = tempfile::tempdir().unwrap();

    for (i, doc) in all_documents().into_iter().enumerate() {
        let path = doc.write_to(dir.path(), &format!("seed-{i}.json")).unwrap();
        let fixture = TestFixture::with_seed(Arc::new(FileSeedSource::new(path)));
        let email = format!("user{i}@x.com");

        let authors = fixture.authors().initialize_authors(&email).await.unwrap();
        let books = fixture.books().initialize_books(&email).await.unwrap();

        match (doc.expected_authors, doc.expected_books) {
            (Some(a), Some(b)) => {
                assert_eq!(authors, SeedOutcome::Seeded, "{}", doc.name);
                assert_eq!(books, SeedOutcome::Seeded, "{}", doc.name);
                assert_eq!(fixture.authors().fetch_authors().len(), a, "{}", doc.name);
                assert_eq!(fixture.books().fetch_books().await.unwrap().len(), b, "{}", doc.name);
            }
            _ => {
                assert!(authors.is_fallback(), "{}", doc.name);
                assert!(books.is_fallback(), "{}", doc.name);
                assert_eq!(fixture.authors().fetch_authors(), fallback_authors());
                let stored: Vec<_> = fixture
                    .books()
                    .fetch_books()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|b| b.into_book())
                    .collect();
                assert_eq!(stored, fallback_books());
            }
        }
    }
}

#[tokio::test]
async fn missing_seed_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = CatalogConfig::default()
        .with_seed(SeedLocation::File(dir.path().join("absent.json")));
    let catalog = Catalog::open(&config).unwrap();

    catalog.auth().register("ann@x.com", "pw").await.unwrap();

    let books = catalog.books().fetch_books().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[1].title, "Game of Thrones");
    assert_eq!(books[1].author.as_ref().unwrap().name, "George R.R. Martin");
}

#[tokio::test]
async fn seeded_library_resolves_authors() {
    let dir = tempfile::tempdir().unwrap();
    let doc = &all_documents()[0];
    let path = doc.write_to(dir.path(), "db.json").unwrap();

    let config = CatalogConfig::default().with_seed(SeedLocation::File(path));
    let catalog = Catalog::open(&config).unwrap();
    catalog.auth().register("ann@x.com", "pw").await.unwrap();

    let books = catalog.books().fetch_books().await.unwrap();
    assert_eq!(books.len(), 4);
    assert!(books.iter().all(|b| !b.is_dangling()));
    assert_eq!(
        books.iter().filter(|b| b.author_id.get() == 1).count(),
        2
    );
}
