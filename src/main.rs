use anyhow::anyhow;
use clap::Parser;
use review_gate::cli::args::Args;
use review_gate::config::Config;
use review_gate::infrastructure::logging::setup_logging;
use review_gate::models::{DisplayReview, ProductId, ReviewDraft};
use review_gate::review::{RejectionReason, ReviewSubmitter, SubmissionResult};
use review_gate::storage::ReviewStore;
use serde_json::json;

fn stars(review: &DisplayReview) -> String {
    let filled = review.rating.value() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_rejection(reason: RejectionReason, as_json: bool) {
    if as_json {
        let output = json!({
            "status": "rejected",
            "reason": reason.as_str(),
            "message": reason.message(),
        });
        println!("{}", output);
    } else {
        eprintln!("❌ {}", reason);
    }
}

async fn handle_list(store: &dyn ReviewStore, product_id: &ProductId, as_json: bool) -> anyhow::Result<()> {
    let reviews = store.list_reviews(product_id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&reviews)?);
        return Ok(());
    }

    if reviews.is_empty() {
        println!("商品 {} 暂无评论", product_id);
        return Ok(());
    }

    println!("📝 商品 {} 共 {} 条评论:", product_id, reviews.len());
    for stored in reviews {
        let created_at = stored.created_at.format("%Y-%m-%d %H:%M").to_string();
        let review = DisplayReview::from(stored);
        println!("  {} {} ({})", stars(&review), review.display_name, created_at);
        println!("     {}", review.comment);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::new();
    config.update_from_args(&args);

    setup_logging(config.logging_config())?;

    config.validate()?;

    let product_id = args
        .product_id
        .as_deref()
        .map(ProductId::parse)
        .ok_or_else(|| anyhow!("--product-id is required"))?;

    let store = config.build_store()?;

    if args.list {
        handle_list(&store, &product_id, args.json).await?;
        return Ok(());
    }

    let submitter = ReviewSubmitter::new(store, config.build_filter()?);
    let draft = ReviewDraft::from_form(product_id, &args.rating, &args.comment);

    if args.check {
        match submitter.check(&draft) {
            Ok(review) => {
                if args.json {
                    println!("{}", json!({ "status": "ok", "review": review }));
                } else {
                    println!("✅ 评论通过本地检查");
                }
            }
            Err(reason) => {
                print_rejection(reason, args.json);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    match submitter.submit(&draft).await {
        SubmissionResult::Accepted(review) => {
            if args.json {
                println!("{}", json!({ "status": "accepted", "review": review }));
            } else {
                println!("✅ 评论已提交");
                println!("  {} {}: {}", stars(&review), review.display_name, review.comment);
            }
        }
        SubmissionResult::Rejected(reason) => {
            print_rejection(reason, args.json);
            std::process::exit(1);
        }
    }

    Ok(())
}
