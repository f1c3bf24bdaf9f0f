//! Interactive session
//!
//! One task owns the feed reconciler and multiplexes live pushes, finished
//! page fetches and stdin commands with `select!`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use catchu_core::app::{AccountService, Applied, CommentService, FeedReconciler, LoadMoreOutcome, PageResult};
use catchu_core::domain::entities::PostId;
use catchu_core::domain::ports::{CommentStore, PostStore, ProfileStore};

use crate::command::{help_text, parse_command, Command};
use crate::render::{render_feed, render_post, render_profile};

/// Tone attached to comments typed in the terminal
const DEFAULT_TONE: &str = "neutral";

enum Flow {
    Continue,
    Quit,
}

pub struct Session<PS, CS, PR>
where
    PS: PostStore + 'static,
    CS: CommentStore,
    PR: ProfileStore,
{
    feed: FeedReconciler<PS>,
    posts: Arc<PS>,
    comments: CommentService<CS>,
    account: AccountService<PR>,
    /// Upper bound on waiting for a comment thread's first push
    thread_wait: Duration,
    page_tx: mpsc::UnboundedSender<PageResult>,
    page_rx: mpsc::UnboundedReceiver<PageResult>,
}

impl<PS, CS, PR> Session<PS, CS, PR>
where
    PS: PostStore + 'static,
    CS: CommentStore,
    PR: ProfileStore,
{
    pub fn new(
        feed: FeedReconciler<PS>,
        posts: Arc<PS>,
        comments: Arc<CS>,
        profiles: Arc<PR>,
        thread_wait: Duration,
    ) -> Self {
        let (page_tx, page_rx) = mpsc::unbounded_channel();
        Self {
            feed,
            posts,
            comments: CommentService::new(comments),
            account: AccountService::new(profiles),
            thread_wait,
            page_tx,
            page_rx,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        if self.feed.user().is_none() {
            println!("Not signed in. Set CATCHU_USER_ID to see the feed.");
        }
        println!("{}", help_text());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let subscribed = self.feed.is_subscribed();
            tokio::select! {
                push = self.feed.recv_push(), if subscribed => {
                    if let Some(push) = push {
                        if self.feed.apply_push(push) == Applied::Applied {
                            print!("{}", render_feed(self.feed.state()));
                        }
                    }
                }
                Some(done) = self.page_rx.recv() => {
                    match self.feed.finish_load_more(done) {
                        LoadMoreOutcome::Loaded { added, .. } => {
                            tracing::debug!("Merged {} older posts", added);
                            print!("{}", render_feed(self.feed.state()));
                        }
                        LoadMoreOutcome::Failed(e) => println!("! {}", e),
                        LoadMoreOutcome::Stale => {}
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match self.handle(&line).await {
                        Flow::Continue => {}
                        Flow::Quit => break,
                    }
                }
            }
        }

        self.feed.shutdown();
        Ok(())
    }

    async fn handle(&mut self, line: &str) -> Flow {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                println!("{} (type `help`)", e);
                return Flow::Continue;
            }
        };

        match command {
            Command::More => self.load_more(),
            Command::Refresh => {
                self.feed.refresh().await;
                print!("{}", render_feed(self.feed.state()));
            }
            Command::Brand(brand) => {
                self.feed.toggle_brand(&brand);
                print!("{}", render_feed(self.feed.state()));
            }
            Command::Category(category) => {
                self.feed.toggle_category(&category);
                print!("{}", render_feed(self.feed.state()));
            }
            Command::Clear => {
                self.feed.clear_filters();
                print!("{}", render_feed(self.feed.state()));
            }
            Command::Show(id) => self.show(&PostId::new(id)).await,
            Command::Comment { post_id, text } => {
                let post_id = PostId::new(post_id);
                match self
                    .comments
                    .create(self.feed.user(), &post_id, &text, DEFAULT_TONE)
                    .await
                {
                    Ok(id) => println!("Commented ({})", id),
                    Err(e) => println!("! {}", e),
                }
            }
            Command::Profile => match self.account.profile(self.feed.user()).await {
                Ok(profile) => print!("{}", render_profile(&profile)),
                Err(e) => println!("! {}", e),
            },
            Command::Help => println!("{}", help_text()),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Start a page fetch in the background; its result comes back on `page_rx`
    fn load_more(&mut self) {
        let Some(request) = self.feed.begin_load_more() else {
            if self.feed.state().is_fetching_more() {
                println!("Already loading...");
            } else if !self.feed.state().has_more() {
                println!("You're all caught up.");
            }
            return;
        };

        let fetch = self.feed.page_fetch(request);
        let tx = self.page_tx.clone();
        tokio::spawn(async move {
            // Receiver only goes away on shutdown
            let _ = tx.send(fetch.await);
        });
        println!("Loading more...");
    }

    async fn show(&self, id: &PostId) {
        let post = match self.posts.get_by_id(id).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                println!("No post {}", id);
                return;
            }
            Err(e) => {
                println!("! {}", e);
                return;
            }
        };

        let comments = match self.comments.watch(id).await {
            Ok(mut thread) => {
                let first = tokio::time::timeout(self.thread_wait, thread.next()).await;
                thread.close();
                match first {
                    Ok(Some(Ok(comments))) => comments,
                    Ok(Some(Err(e))) => {
                        println!("! Comments unavailable: {}", e);
                        Vec::new()
                    }
                    _ => Vec::new(),
                }
            }
            Err(e) => {
                println!("! Comments unavailable: {}", e);
                Vec::new()
            }
        };

        print!("{}", render_post(&post, &comments));
    }
}
