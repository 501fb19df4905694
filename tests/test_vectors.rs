use hd_keytree::{entropy_to_mnemonic, ExtendedKey, Mnemonic, HARDENED_OFFSET};
use hex_literal::hex;

struct TestVector {
    seed: &'static [u8],
    derivations: &'static [Derivation],
}

struct Derivation {
    path: &'static str,
    index: Option<u32>,

    expected_chain_code: [u8; 32],
    expected_secret_key: [u8; 32],
    expected_public_key: [u8; 33],
}

/// BIP32 test vectors 1, 2 and 3
const TEST_VECTORS: &[TestVector] = &[
    TestVector {
        seed: &hex!("000102030405060708090a0b0c0d0e0f"),
        derivations: &[
            Derivation {
                path: "m",
                index: None,
                expected_chain_code: hex!(
                    "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
                ),
                expected_secret_key: hex!(
                    "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
                ),
                expected_public_key: hex!(
                    "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
                ),
            },
            Derivation {
                path: "m/0'",
                index: Some(HARDENED_OFFSET),
                expected_chain_code: hex!(
                    "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
                ),
                expected_secret_key: hex!(
                    "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
                ),
                expected_public_key: hex!(
                    "035a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56"
                ),
            },
            Derivation {
                path: "m/0'/1",
                index: Some(1),
                expected_chain_code: hex!(
                    "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
                ),
                expected_secret_key: hex!(
                    "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
                ),
                expected_public_key: hex!(
                    "03501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c"
                ),
            },
            Derivation {
                path: "m/0'/1/2'",
                index: Some(HARDENED_OFFSET + 2),
                expected_chain_code: hex!(
                    "04466b9cc8e161e966409ca52986c584f07e9dc81f735db683c3ff6ec7b1503f"
                ),
                expected_secret_key: hex!(
                    "cbce0d719ecf7431d88e6a89fa1483e02e35092af60c042b1df2ff59fa424dca"
                ),
                expected_public_key: hex!(
                    "0357bfe1e341d01c69fe5654309956cbea516822fba8a601743a012a7896ee8dc2"
                ),
            },
            Derivation {
                path: "m/0'/1/2'/2",
                index: Some(2),
                expected_chain_code: hex!(
                    "cfb71883f01676f587d023cc53a35bc7f88f724b1f8c2892ac1275ac822a3edd"
                ),
                expected_secret_key: hex!(
                    "0f479245fb19a38a1954c5c7c0ebab2f9bdfd96a17563ef28a6a4b1a2a764ef4"
                ),
                expected_public_key: hex!(
                    "02e8445082a72f29b75ca48748a914df60622a609cacfce8ed0e35804560741d29"
                ),
            },
            Derivation {
                path: "m/0'/1/2'/2/1000000000",
                index: Some(1_000_000_000),
                expected_chain_code: hex!(
                    "c783e67b921d2beb8f6b389cc646d7263b4145701dadd2161548a8b078e65e9e"
                ),
                expected_secret_key: hex!(
                    "471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8"
                ),
                expected_public_key: hex!(
                    "022a471424da5e657499d1ff51cb43c47481a03b1e77f951fe64cec9f5a48f7011"
                ),
            },
        ],
    },
    TestVector {
        seed: &hex!(
            "fffcf9f6f3f0edeae7e4e1dedbd8d5d2cfccc9c6c3c0bdbab7b4b1aeaba8a5a2"
            "9f9c999693908d8a8784817e7b7875726f6c696663605d5a5754514e4b484542"
        ),
        derivations: &[
            Derivation {
                path: "m",
                index: None,
                expected_chain_code: hex!(
                    "60499f801b896d83179a4374aeb7822aaeaceaa0db1f85ee3e904c4defbd9689"
                ),
                expected_secret_key: hex!(
                    "4b03d6fc340455b363f51020ad3ecca4f0850280cf436c70c727923f6db46c3e"
                ),
                expected_public_key: hex!(
                    "03cbcaa9c98c877a26977d00825c956a238e8dddfbd322cce4f74b0b5bd6ace4a7"
                ),
            },
            Derivation {
                path: "m/0",
                index: Some(0),
                expected_chain_code: hex!(
                    "f0909affaa7ee7abe5dd4e100598d4dc53cd709d5a5c2cac40e7412f232f7c9c"
                ),
                expected_secret_key: hex!(
                    "abe74a98f6c7eabee0428f53798f0ab8aa1bd37873999041703c742f15ac7e1e"
                ),
                expected_public_key: hex!(
                    "02fc9e5af0ac8d9b3cecfe2a888e2117ba3d089d8585886c9c826b6b22a98d12ea"
                ),
            },
            Derivation {
                path: "m/0/2147483647'",
                index: Some(u32::MAX),
                expected_chain_code: hex!(
                    "be17a268474a6bb9c61e1d720cf6215e2a88c5406c4aee7b38547f585c9a37d9"
                ),
                expected_secret_key: hex!(
                    "877c779ad9687164e9c2f4f0f4ff0340814392330693ce95a58fe18fd52e6e93"
                ),
                expected_public_key: hex!(
                    "03c01e7425647bdefa82b12d9bad5e3e6865bee0502694b94ca58b666abc0a5c3b"
                ),
            },
            Derivation {
                path: "m/0/2147483647'/1",
                index: Some(1),
                expected_chain_code: hex!(
                    "f366f48f1ea9f2d1d3fe958c95ca84ea18e4c4ddb9366c336c927eb246fb38cb"
                ),
                expected_secret_key: hex!(
                    "704addf544a06e5ee4bea37098463c23613da32020d604506da8c0518e1da4b7"
                ),
                expected_public_key: hex!(
                    "03a7d1d856deb74c508e05031f9895dab54626251b3806e16b4bd12e781a7df5b9"
                ),
            },
            Derivation {
                path: "m/0/2147483647'/1/2147483646'",
                index: Some(u32::MAX - 1),
                expected_chain_code: hex!(
                    "637807030d55d01f9a0cb3a7839515d796bd07706386a6eddf06cc29a65a0e29"
                ),
                expected_secret_key: hex!(
                    "f1c7c871a54a804afe328b4c83a1c33b8e5ff48f5087273f04efa83b247d6a2d"
                ),
                expected_public_key: hex!(
                    "02d2b36900396c9282fa14628566582f206a5dd0bcc8d5e892611806cafb0301f0"
                ),
            },
            Derivation {
                path: "m/0/2147483647'/1/2147483646'/2",
                index: Some(2),
                expected_chain_code: hex!(
                    "9452b549be8cea3ecb7a84bec10dcfd94afe4d129ebfd3b3cb58eedf394ed271"
                ),
                expected_secret_key: hex!(
                    "bb7d39bdb83ecf58f2fd82b6d918341cbef428661ef01ab97c28a4842125ac23"
                ),
                expected_public_key: hex!(
                    "024d902e1a2fc7a8755ab5b694c575fce742c48d9ff192e63df5193e4c7afe1f9c"
                ),
            },
        ],
    },
    // leading zero in the master private key
    TestVector {
        seed: &hex!(
            "4b381541583be4423346c643850da4b320e46a87ae3d2a4e6da11eba819cd4ac"
            "ba45d239319ac14f863b8d5ab5a0d0c64d2e8a1e7d1457df2e5a3c51c73235be"
        ),
        derivations: &[
            Derivation {
                path: "m",
                index: None,
                expected_chain_code: hex!(
                    "01d28a3e53cffa419ec122c968b3259e16b65076495494d97cae10bbfec3c36f"
                ),
                expected_secret_key: hex!(
                    "00ddb80b067e0d4993197fe10f2657a844a384589847602d56f0c629c81aae32"
                ),
                expected_public_key: hex!(
                    "03683af1ba5743bdfc798cf814efeeab2735ec52d95eced528e692b8e34c4e5669"
                ),
            },
            Derivation {
                path: "m/0'",
                index: Some(HARDENED_OFFSET),
                expected_chain_code: hex!(
                    "e5fea12a97b927fc9dc3d2cb0d1ea1cf50aa5a1fdc1f933e8906bb38df3377bd"
                ),
                expected_secret_key: hex!(
                    "491f7a2eebc7b57028e0d3faa0acda02e75c33b03c48fb288c41e2ea44e1daef"
                ),
                expected_public_key: hex!(
                    "026557fdda1d5d43d79611f784780471f086d58e8126b8c40acb82272a7712e7f2"
                ),
            },
        ],
    },
];

#[test]
fn bip32_test_vectors() {
    for vector in TEST_VECTORS {
        let master: ExtendedKey = ExtendedKey::from_seed(vector.seed).unwrap();

        for derivation in vector.derivations {
            let key = if derivation.path == "m" {
                master.clone()
            } else {
                master.derive_path_str(derivation.path).unwrap()
            };

            assert_eq!(key.index(), derivation.index, "{}", derivation.path);
            assert_eq!(key.chain_code(), &derivation.expected_chain_code);
            assert_eq!(key.public_key().as_bytes(), &derivation.expected_public_key);
            assert_eq!(
                key.private_key().unwrap().as_bytes(),
                &derivation.expected_secret_key,
            );
        }
    }
}

#[test]
fn bip32_public_derivation_matches_vectors() {
    // normal steps after the last hardened one can be taken from the neutered node
    let master: ExtendedKey = ExtendedKey::from_seed(TEST_VECTORS[0].seed).unwrap();
    let parent = master.derive_path_str("m/0'/1/2'").unwrap().neutered();
    let key = parent.derive_path_str("2/1000000000").unwrap();
    assert_eq!(key.private_key(), None);
    assert_eq!(
        key.public_key().as_bytes(),
        &TEST_VECTORS[0].derivations[5].expected_public_key
    );
    assert_eq!(
        key.chain_code(),
        &TEST_VECTORS[0].derivations[5].expected_chain_code
    );
}

struct MnemonicVector {
    entropy: &'static [u8],
    phrase: &'static str,
}

/// Reference vectors from the BIP39 test suite
const MNEMONIC_VECTORS: &[MnemonicVector] = &[
    MnemonicVector {
        entropy: &hex!("00000000000000000000000000000000"),
        phrase: "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
    },
    MnemonicVector {
        entropy: &hex!("7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f"),
        phrase: "legal winner thank year wave sausage worth useful legal winner thank yellow",
    },
    MnemonicVector {
        entropy: &hex!("80808080808080808080808080808080"),
        phrase: "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
    },
    MnemonicVector {
        entropy: &hex!("ffffffffffffffffffffffffffffffff"),
        phrase: "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
    },
    MnemonicVector {
        entropy: &hex!("0000000000000000000000000000000000000000"),
        phrase: "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon address",
    },
    MnemonicVector {
        entropy: &hex!("000000000000000000000000000000000000000000000000"),
        phrase: "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon agent",
    },
    MnemonicVector {
        entropy: &hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        phrase: "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art",
    },
    MnemonicVector {
        entropy: &hex!("9e885d952ad362caeb4efe34a8e91bd2"),
        phrase: "ozone drill grab fiber curtain grace pudding thank cruise elder eight picnic",
    },
    MnemonicVector {
        entropy: &hex!("c0ba5a8e914111210f2bd131f3d5e08d"),
        phrase: "scheme spot photo card baby mountain device kick cradle pact join borrow",
    },
    MnemonicVector {
        entropy: &hex!("f585c11aec520db57dd353c69554b21a89b20fb0650966fa0a9d6f74fd989d8f"),
        phrase: "void come effort suffer camp survey warrior heavy shoot primary clutch crush open amazing screen patrol group space point ten exist slush involve unfold",
    },
];

#[test]
fn bip39_test_vectors() {
    for vector in MNEMONIC_VECTORS {
        assert_eq!(entropy_to_mnemonic(vector.entropy).unwrap(), vector.phrase);

        let parsed = Mnemonic::parse(vector.phrase).unwrap();
        assert_eq!(parsed.to_entropy(), vector.entropy);
        assert_eq!(parsed.word_count(), vector.entropy.len() * 3 / 4);
    }
}

#[test]
fn bip39_seed_with_passphrase() {
    let mnemonic = Mnemonic::parse(MNEMONIC_VECTORS[0].phrase).unwrap();
    assert_eq!(
        mnemonic.to_seed("TREZOR"),
        hex!(
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553"
            "1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        )
    );
}
