use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["shopscroll-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_browse_products_with_defaults() {
    let cli = Cli::try_parse_from(["shopscroll-cli", "browse", "products"]).unwrap();
    match cli.command {
        Some(Commands::Browse {
            command: BrowseCommands::Products { args },
        }) => {
            assert_eq!(args.page_size, None);
            assert_eq!(args.max_pages, 10);
            assert!(!args.navigate);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_browse_collection_with_options() {
    let cli = Cli::try_parse_from([
        "shopscroll-cli",
        "browse",
        "collection",
        "snowboards",
        "--page-size",
        "12",
        "--max-pages",
        "3",
        "--navigate",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Browse {
            command: BrowseCommands::Collection { handle, args },
        }) => {
            assert_eq!(handle, "snowboards");
            assert_eq!(args.page_size, Some(12));
            assert_eq!(args.max_pages, 3);
            assert!(args.navigate);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn browse_collection_requires_handle() {
    assert!(Cli::try_parse_from(["shopscroll-cli", "browse", "collection"]).is_err());
}

#[test]
fn zero_page_size_is_rejected() {
    assert!(
        Cli::try_parse_from(["shopscroll-cli", "browse", "products", "--page-size", "0"]).is_err()
    );
}

#[test]
fn zero_max_pages_is_rejected() {
    assert!(
        Cli::try_parse_from(["shopscroll-cli", "browse", "products", "--max-pages", "0"]).is_err()
    );
}
