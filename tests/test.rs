use errormap::{
    cluster, compute_cluster_radius, haversine_distance, markers_from_reports, Cluster,
    ClusterConfig, ClusterEvent, ClusterList, ClusterSession, ClusterWorker, ErrorFilter,
    ErrorReport, GeoPoint, Marker, Viewport,
};
use serde_json::json;

/*-------------------------------------------------------------------------------------------------
 *
 *                                      Helpers
 *
 *-----------------------------------------------------------------------------------------------*/
fn marker(lat: f64, lon: f64, title: &str) -> Marker {
    Marker::new(GeoPoint::new(lat, lon), title, Some(format!("id-{}", title)))
}

fn titles(clust: &Cluster) -> Vec<&str> {
    clust.members().iter().map(|m| m.title.as_str()).collect()
}

/// A deterministic scatter of markers around Trondheim.
fn scatter(n: usize) -> Vec<Marker> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10_000.0
    };

    (0..n)
        .map(|i| {
            let lat = 63.40 + 0.05 * next();
            let lon = 10.38 + 0.08 * next();
            marker(lat, lon, &i.to_string())
        })
        .collect()
}

/*-------------------------------------------------------------------------------------------------
 *
 *                                  Clustering properties
 *
 *-----------------------------------------------------------------------------------------------*/
#[test]
fn test_partition_property() {
    let markers = scatter(150);

    for radius in [0.1, 0.5, 1.0, 2.0, 10.0] {
        let clusters = cluster(&markers, radius);

        let total: usize = clusters.iter().map(Cluster::len).sum();
        assert_eq!(total, markers.len());

        let mut counts = vec![0; markers.len()];
        for clust in &clusters {
            assert!(!clust.is_empty());
            for m in clust.members() {
                let idx: usize = m.title.parse().unwrap();
                counts[idx] += 1;
            }
        }
        assert!(counts.iter().all(|&c| c == 1));
    }
}

#[test]
fn test_singleton_stability() {
    let markers = scatter(25);
    let clusters = cluster(&markers, 0.0);

    assert_eq!(clusters.len(), markers.len());
    for (clust, m) in clusters.iter().zip(&markers) {
        assert!(clust.is_singleton());
        assert_eq!(clust.members()[0], *m);
        assert_eq!(clust.centroid(), m.coordinate);
    }
}

#[test]
fn test_full_merge() {
    let markers = [
        marker(63.4186, 10.4059, "a"),
        marker(63.4220, 10.4100, "b"),
        marker(63.4150, 10.4010, "c"),
    ];

    for i in 0..markers.len() {
        for j in 0..markers.len() {
            assert!(haversine_distance(markers[i].coordinate, markers[j].coordinate) < 1.0);
        }
    }

    let clusters = cluster(&markers, 10.0);
    assert_eq!(clusters.len(), 1);
    assert_eq!(titles(&clusters[0]), vec!["a", "b", "c"]);
}

#[test]
fn test_centroid_correctness() {
    let markers = [marker(0.0, 0.0, "a"), marker(0.0, 2.0, "b")];
    let clusters = cluster(&markers, 500.0);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].centroid(), GeoPoint::new(0.0, 1.0));

    let half_span = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
    assert!((clusters[0].extent_km() - half_span).abs() < 1.0e-9);
}

#[test]
fn test_distance_symmetry_and_identity() {
    let markers = scatter(20);

    for a in &markers {
        assert_eq!(haversine_distance(a.coordinate, a.coordinate), 0.0);
        for b in &markers {
            let ab = haversine_distance(a.coordinate, b.coordinate);
            let ba = haversine_distance(b.coordinate, a.coordinate);
            assert!((ab - ba).abs() < 1.0e-12);
        }
    }
}

#[test]
fn test_radius_monotonicity() {
    let r1 = compute_cluster_radius(0.01);
    let r2 = compute_cluster_radius(0.02);

    assert!((r2 - 2.0 * r1).abs() < 1.0e-12);
    assert!(compute_cluster_radius(0.5) < compute_cluster_radius(0.6));
}

#[test]
fn test_seed_only_linkage() {
    let s = GeoPoint::new(0.0, 0.0);
    let a = GeoPoint::new(0.0, 0.04);
    let b = GeoPoint::new(0.0, 0.08);

    assert!(haversine_distance(s, a) < 5.0);
    assert!(haversine_distance(a, b) < 5.0);
    assert!(haversine_distance(s, b) > 5.0);

    let markers = [
        Marker::new(s, "S", None),
        Marker::new(a, "A", None),
        Marker::new(b, "B", None),
    ];
    let clusters = cluster(&markers, 5.0);

    assert_eq!(clusters.len(), 2);
    assert_eq!(titles(&clusters[0]), vec!["S", "A"]);
    assert_eq!(titles(&clusters[1]), vec!["B"]);
}

#[test]
fn test_clusters_follow_seed_order() {
    let markers = [
        marker(0.0, 0.0, "first"),
        marker(20.0, 20.0, "second"),
        marker(0.0, 0.001, "joins first"),
        marker(40.0, 40.0, "third"),
    ];

    let clusters = cluster(&markers, 1.0);
    let seeds: Vec<&str> = clusters.iter().map(|c| titles(c)[0]).collect();
    assert_eq!(seeds, vec!["first", "second", "third"]);
    assert_eq!(titles(&clusters[0]), vec!["first", "joins first"]);
}

/*-------------------------------------------------------------------------------------------------
 *
 *                                 Loading through clustering
 *
 *-----------------------------------------------------------------------------------------------*/
fn backend_response() -> String {
    json!([
        {
            "id": "e1",
            "title": "Loose wire harness",
            "system": "Electrical",
            "subsystem": "Wire Harness",
            "location": {"latitude": 63.4186, "longitude": 10.4059},
            "timestamp": 1_700_000_000_000i64,
            "resolved": false,
            "user": "u1"
        },
        {
            "id": "e2",
            "title": "Harness chafing",
            "system": "Electrical",
            "subsystem": "Wire Harness",
            "location": {"latitude": 63.4188, "longitude": 10.4062},
            "timestamp": 1_700_000_100_000i64,
            "resolved": false,
            "user": "u2"
        },
        {
            "id": "e3",
            "title": "Broken location",
            "system": "Mechanical",
            "subsystem": "Chassis",
            "location": {"latitude": -91.0, "longitude": 10.4},
            "timestamp": 1_700_000_200_000i64,
            "resolved": false,
            "user": "u1"
        },
        {
            "id": "e4",
            "title": "Front wing delaminated",
            "system": "Mechanical",
            "subsystem": "Front Wing",
            "location": {"latitude": 63.4400, "longitude": 10.4500},
            "timestamp": 1_700_000_300_000i64,
            "resolved": true,
            "user": "u3"
        }
    ])
    .to_string()
}

#[test]
fn test_reports_to_clusters() {
    let reports = ErrorReport::parse_list(&backend_response()).unwrap();
    assert_eq!(reports.len(), 4);

    let markers = markers_from_reports(&reports);
    assert_eq!(markers.len(), 3);

    let vp = Viewport::new(GeoPoint::new(63.43, 10.42), 0.05, 0.05);
    let list = ClusterList::from_markers(&markers, &vp, &ClusterConfig::default());

    assert_eq!(list.total_markers(), 3);
    assert_eq!(list.len(), 2);
    assert_eq!(
        list.clusters[0].error_ids().collect::<Vec<_>>(),
        vec!["e1", "e2"]
    );
}

#[test]
fn test_filtered_reports_to_clusters() {
    let reports = ErrorReport::parse_list(&backend_response()).unwrap();
    let filter = ErrorFilter::new().search("harness").system("electrical");

    let selected = filter.apply(&reports);
    let markers = markers_from_reports(selected.iter().copied());
    assert_eq!(markers.len(), 2);

    let clusters = cluster(&markers, 1.0);
    assert_eq!(clusters.len(), 1);

    let unresolved = ErrorFilter::new().unresolved_only(true).apply(&reports);
    assert_eq!(markers_from_reports(unresolved.iter().copied()).len(), 2);
}

#[test]
fn test_session_and_worker_agree() {
    let reports = ErrorReport::parse_list(&backend_response()).unwrap();
    let markers = markers_from_reports(&reports);
    let vp = Viewport::new(GeoPoint::new(63.43, 10.42), 0.05, 0.05);

    let mut session = ClusterSession::new(ClusterConfig::default());
    session.markers_reloaded(markers.clone());
    session.viewport_settled(vp);

    let worker = ClusterWorker::start(ClusterConfig::default()).unwrap();
    worker.send(ClusterEvent::ViewportSettled(vp)).unwrap();
    worker.send(ClusterEvent::MarkersReloaded(markers)).unwrap();

    let first = worker.latest().unwrap();
    let upd = if first.generation < 2 {
        worker.latest().unwrap()
    } else {
        first
    };
    assert_eq!(upd.generation, 2);
    assert_eq!(upd.clusters.clusters, session.clusters());

    worker.finish().unwrap();
}
