use std::io::{self, Write};

use futures::{Stream, StreamExt};
use tracing::debug;

use crate::provider::{BranchDiffProvider, RefreshSignal};
use crate::render::{RenderOptions, render_tree};
use crate::source::PathSetSource;
use crate::watch::WorkspaceChange;

/// Upper bound of changes that are already queued and handled as one refresh
const CHANGE_BATCH: usize = 256;

/// Renders the tree, then renders it again every time the provider signals a refresh.
///
/// `HeadMoved` re-detects the reference point when `follow_head` is set; an explicitly
/// chosen reference stays and the tree is only invalidated. Returns the number of
/// renders once `changes` ends.
pub async fn watch_tree<S, C, W>(
    provider: &BranchDiffProvider<S>,
    changes: C,
    follow_head: bool,
    out: &mut W,
    options: RenderOptions,
) -> io::Result<usize>
where
    S: PathSetSource,
    C: Stream<Item = WorkspaceChange> + Unpin,
    W: Write,
{
    let mut signals = provider.subscribe();
    let mut changes = changes.ready_chunks(CHANGE_BATCH);

    render_tree(provider, out, options).await?;
    out.flush()?;
    let mut renders = 1;

    while let Some(batch) = changes.next().await {
        debug!("Handling {} workspace changes", batch.len());
        if follow_head && batch.contains(&WorkspaceChange::HeadMoved) {
            provider.refresh_reference_point().await;
        } else {
            provider.invalidate();
        }

        let mut refresh = false;
        while let Ok(signal) = signals.try_recv() {
            match signal {
                RefreshSignal::Invalidated => debug!("Tree invalidated"),
                RefreshSignal::ReferenceChanged(reference) => {
                    debug!("Now comparing against '{}'", reference)
                }
            }
            refresh = true;
        }

        if refresh {
            writeln!(out)?;
            render_tree(provider, out, options).await?;
            out.flush()?;
            renders += 1;
        }
    }

    Ok(renders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderSettings;
    use crate::source::ReferencePoint;
    use crate::source::testing::StaticSource;
    use futures::stream;
    use futures_channel::mpsc;

    fn provider(source: StaticSource) -> BranchDiffProvider<StaticSource> {
        BranchDiffProvider::new(
            source,
            "/repo",
            ProviderSettings::default(),
            ReferencePoint::new("main"),
        )
    }

    fn develop_source() -> StaticSource {
        let source = StaticSource::with_paths(&["a.txt"]);
        StaticSource {
            default_reference: "develop".to_string(),
            ..source
        }
    }

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("output is UTF-8")
    }

    #[compio::test]
    async fn renders_once_without_changes() {
        let provider = provider(StaticSource::with_paths(&["a.txt"]));
        let mut out = Vec::new();

        let renders = watch_tree(
            &provider,
            stream::empty::<WorkspaceChange>(),
            true,
            &mut out,
            RenderOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(renders, 1);
        assert_eq!(output(out), "Changes against main\na.txt\n");
    }

    #[compio::test]
    async fn queued_file_changes_rerender_once() {
        let provider = provider(StaticSource::with_paths(&["a.txt", "b/c.txt"]));
        let (sender, changes) = mpsc::unbounded();
        let mut out = Vec::new();

        sender.unbounded_send(WorkspaceChange::FilesChanged).unwrap();
        sender.unbounded_send(WorkspaceChange::FilesChanged).unwrap();
        drop(sender);

        let renders = watch_tree(&provider, changes, true, &mut out, RenderOptions::default())
            .await
            .unwrap();

        assert_eq!(renders, 2);
        assert_eq!(
            output(out),
            "Changes against main\na.txt\nb/\n  c.txt\n\nChanges against main\na.txt\nb/\n  c.txt\n"
        );
    }

    #[compio::test]
    async fn head_moves_redetect_the_reference() {
        let provider = provider(develop_source());
        let mut out = Vec::new();

        let renders = watch_tree(
            &provider,
            stream::iter([WorkspaceChange::HeadMoved]),
            true,
            &mut out,
            RenderOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(renders, 2);
        assert_eq!(provider.reference_point(), ReferencePoint::new("develop"));
        assert!(output(out).ends_with("\nChanges against develop\na.txt\n"));
    }

    #[compio::test]
    async fn explicit_reference_survives_head_moves() {
        let provider = provider(develop_source());
        let mut out = Vec::new();

        let renders = watch_tree(
            &provider,
            stream::iter([WorkspaceChange::HeadMoved]),
            false,
            &mut out,
            RenderOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(renders, 2);
        assert_eq!(provider.reference_point(), ReferencePoint::new("main"));
        assert!(!output(out).contains("develop"));
    }
}
